//! Parsed record data structures

use std::collections::BTreeMap;

use serde::Serialize;

/// Record kind, derived from the lowercase type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Article,
    Book,
    Booklet,
    InBook,
    InCollection,
    InProceedings,
    Manual,
    MastersThesis,
    Misc,
    PhdThesis,
    Proceedings,
    TechReport,
    Unpublished,
    Online,
    Software,
    Dataset,
    Unknown,
}

impl EntryKind {
    /// Classify a type tag (case-insensitive)
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_lowercase().as_str() {
            "article" => Self::Article,
            "book" => Self::Book,
            "booklet" => Self::Booklet,
            "inbook" => Self::InBook,
            "incollection" => Self::InCollection,
            "inproceedings" | "conference" => Self::InProceedings,
            "manual" => Self::Manual,
            "mastersthesis" => Self::MastersThesis,
            "misc" => Self::Misc,
            "phdthesis" => Self::PhdThesis,
            "proceedings" => Self::Proceedings,
            "techreport" | "report" => Self::TechReport,
            "unpublished" => Self::Unpublished,
            "online" | "electronic" | "www" => Self::Online,
            "software" => Self::Software,
            "dataset" => Self::Dataset,
            _ => Self::Unknown,
        }
    }

    /// Whether a type tag names a non-bibliographic block
    /// (`@comment`, `@preamble`, `@string`).
    pub fn is_directive(tag: &str) -> bool {
        matches!(
            tag.to_lowercase().as_str(),
            "comment" | "preamble" | "string"
        )
    }
}

/// Field names the normalizer reads by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KnownField {
    Title,
    Author,
    Year,
    Date,
    Journal,
    BookTitle,
    Publisher,
    School,
    Institution,
}

impl KnownField {
    /// Lookup by lowercase field name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "title" => Some(Self::Title),
            "author" => Some(Self::Author),
            "year" => Some(Self::Year),
            "date" => Some(Self::Date),
            "journal" => Some(Self::Journal),
            "booktitle" => Some(Self::BookTitle),
            "publisher" => Some(Self::Publisher),
            "school" => Some(Self::School),
            "institution" => Some(Self::Institution),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Year => "year",
            Self::Date => "date",
            Self::Journal => "journal",
            Self::BookTitle => "booktitle",
            Self::Publisher => "publisher",
            Self::School => "school",
            Self::Institution => "institution",
        }
    }
}

/// Field values of one record, keyed by lowercase name.
///
/// Well-known names land in `known`, everything else in `other`. One value
/// per name: inserting a name twice keeps the later value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    known: BTreeMap<KnownField, String>,
    other: BTreeMap<String, String>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value under a field name (lowercased and trimmed here)
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        let name = name.trim().to_lowercase();
        match KnownField::from_name(&name) {
            Some(field) => {
                self.known.insert(field, value.into());
            }
            None => {
                self.other.insert(name, value.into());
            }
        }
    }

    /// Value of a well-known field
    pub fn get(&self, field: KnownField) -> Option<&str> {
        self.known.get(&field).map(String::as_str)
    }

    /// Value by name, case-insensitive, for any field
    pub fn get_by_name(&self, name: &str) -> Option<&str> {
        let name = name.trim().to_lowercase();
        match KnownField::from_name(&name) {
            Some(field) => self.get(field),
            None => self.other.get(&name).map(String::as_str),
        }
    }

    /// First populated value among `fields`, in order
    pub fn first_of(&self, fields: &[KnownField]) -> Option<&str> {
        fields.iter().find_map(|f| self.get(*f))
    }

    pub fn len(&self) -> usize {
        self.known.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty() && self.other.is_empty()
    }

    /// All fields as `(name, value)` pairs, known fields first
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.known
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .chain(self.other.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

impl Serialize for FieldMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A parsed record, as produced by the record parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawRecord {
    /// Citation key; may be empty, not unique
    pub identifier: String,
    /// Lowercased type tag, e.g. `article`
    pub entry_type: String,
    pub fields: FieldMap,
}

impl RawRecord {
    pub fn new(identifier: impl Into<String>, entry_type: &str) -> Self {
        Self {
            identifier: identifier.into(),
            entry_type: entry_type.to_lowercase(),
            fields: FieldMap::new(),
        }
    }

    pub fn kind(&self) -> EntryKind {
        EntryKind::from_tag(&self.entry_type)
    }

    pub fn field(&self, field: KnownField) -> Option<&str> {
        self.fields.get(field)
    }

    pub fn title(&self) -> Option<&str> {
        self.field(KnownField::Title)
    }

    pub fn author(&self) -> Option<&str> {
        self.field(KnownField::Author)
    }

    pub fn year(&self) -> Option<&str> {
        self.field(KnownField::Year)
    }
}
