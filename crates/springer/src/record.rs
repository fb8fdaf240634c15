// ABOUTME: PublicationRecord and its Book, Article and ConferencePaper variants.
// ABOUTME: Records serialize with bibliography field names (ENTRYTYPE, ID, ISBN).

use serde::{Deserialize, Serialize};

/// A book landing page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "ENTRYTYPE")]
    pub entry_type: String,
    #[serde(rename = "ID")]
    pub id: String,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub chapters: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub doi: String,
    #[serde(rename = "ISBN")]
    pub isbn: String,
    pub url: String,
}

/// A conference paper page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConferencePaper {
    #[serde(rename = "ENTRYTYPE")]
    pub entry_type: String,
    #[serde(rename = "ID")]
    pub id: String,
    pub title: String,
    pub author: String,
    pub booktitle: String,
    pub publisher: String,
    pub year: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub doi: String,
    pub timestamp: String,
    pub url: String,
}

/// A journal article page, or any page with an unrecognized type tag.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Article {
    #[serde(rename = "ENTRYTYPE")]
    pub entry_type: String,
    #[serde(rename = "ID")]
    pub id: String,
    pub author: String,
    pub title: String,
    pub journal: String,
    pub publisher: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub year: String,
    pub timestamp: String,
    pub doi: String,
    pub url: String,
}

/// One extracted record. Serializes as a flat object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PublicationRecord {
    Book(Book),
    Article(Article),
    ConferencePaper(ConferencePaper),
}

impl PublicationRecord {
    /// The `ENTRYTYPE` value.
    pub fn entry_type(&self) -> &str {
        match self {
            PublicationRecord::Book(b) => &b.entry_type,
            PublicationRecord::Article(a) => &a.entry_type,
            PublicationRecord::ConferencePaper(p) => &p.entry_type,
        }
    }

    /// The `ID` value.
    pub fn id(&self) -> &str {
        match self {
            PublicationRecord::Book(b) => &b.id,
            PublicationRecord::Article(a) => &a.id,
            PublicationRecord::ConferencePaper(p) => &p.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            PublicationRecord::Book(b) => &b.title,
            PublicationRecord::Article(a) => &a.title,
            PublicationRecord::ConferencePaper(p) => &p.title,
        }
    }

    pub fn author(&self) -> &str {
        match self {
            PublicationRecord::Book(b) => &b.author,
            PublicationRecord::Article(a) => &a.author,
            PublicationRecord::ConferencePaper(p) => &p.author,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            PublicationRecord::Book(b) => &b.url,
            PublicationRecord::Article(a) => &a.url,
            PublicationRecord::ConferencePaper(p) => &p.url,
        }
    }

    /// Data fields in extraction order, without `ENTRYTYPE` and `ID`.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        match self {
            PublicationRecord::Book(b) => vec![
                ("title", b.title.as_str()),
                ("author", b.author.as_str()),
                ("publisher", b.publisher.as_str()),
                ("chapters", b.chapters.as_str()),
                ("abstract", b.abstract_text.as_str()),
                ("doi", b.doi.as_str()),
                ("ISBN", b.isbn.as_str()),
                ("url", b.url.as_str()),
            ],
            PublicationRecord::ConferencePaper(p) => vec![
                ("title", p.title.as_str()),
                ("author", p.author.as_str()),
                ("booktitle", p.booktitle.as_str()),
                ("publisher", p.publisher.as_str()),
                ("year", p.year.as_str()),
                ("abstract", p.abstract_text.as_str()),
                ("doi", p.doi.as_str()),
                ("timestamp", p.timestamp.as_str()),
                ("url", p.url.as_str()),
            ],
            PublicationRecord::Article(a) => vec![
                ("author", a.author.as_str()),
                ("title", a.title.as_str()),
                ("journal", a.journal.as_str()),
                ("publisher", a.publisher.as_str()),
                ("abstract", a.abstract_text.as_str()),
                ("year", a.year.as_str()),
                ("timestamp", a.timestamp.as_str()),
                ("doi", a.doi.as_str()),
                ("url", a.url.as_str()),
            ],
        }
    }

    /// Looks up a field by its serialized name, including `ENTRYTYPE` and `ID`.
    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            "ENTRYTYPE" => Some(self.entry_type()),
            "ID" => Some(self.id()),
            _ => self
                .fields()
                .into_iter()
                .find(|(field, _)| *field == name)
                .map(|(_, value)| value),
        }
    }

    pub fn is_book(&self) -> bool {
        matches!(self, PublicationRecord::Book(_))
    }

    pub fn is_article(&self) -> bool {
        matches!(self, PublicationRecord::Article(_))
    }

    pub fn is_conference_paper(&self) -> bool {
        matches!(self, PublicationRecord::ConferencePaper(_))
    }
}

impl From<Book> for PublicationRecord {
    fn from(b: Book) -> Self {
        PublicationRecord::Book(b)
    }
}

impl From<Article> for PublicationRecord {
    fn from(a: Article) -> Self {
        PublicationRecord::Article(a)
    }
}

impl From<ConferencePaper> for PublicationRecord {
    fn from(p: ConferencePaper) -> Self {
        PublicationRecord::ConferencePaper(p)
    }
}
