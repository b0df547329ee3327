use std::fmt;
use std::str::FromStr;

use shelf_kernel::{NewBook, Numeric};
use thiserror::Error;

/// Editable field of the new-book form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Title,
    Author,
    Category,
    PublishedYear,
    AvailableCopies,
}

impl FormField {
    pub const ALL: [Self; 5] = [
        Self::Title,
        Self::Author,
        Self::Category,
        Self::PublishedYear,
        Self::AvailableCopies,
    ];

    /// Placeholder label shown next to the field
    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Author => "Author",
            Self::Category => "Category",
            Self::PublishedYear => "Published Year",
            Self::AvailableCopies => "Available Copies",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown field '{0}'; expected title, author, category, year, or copies")]
pub struct UnknownField(pub String);

impl FromStr for FormField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "author" => Ok(Self::Author),
            "category" => Ok(Self::Category),
            "year" | "publishedyear" | "published_year" => Ok(Self::PublishedYear),
            "copies" | "availablecopies" | "available_copies" => Ok(Self::AvailableCopies),
            _ => Err(UnknownField(s.to_string())),
        }
    }
}

/// Staging area for a book that has not been submitted yet.
///
/// Every field is raw text, numeric ones included; conversion happens only
/// in [`BookForm::to_new_book`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub category: String,
    pub published_year: String,
    pub available_copies: String,
}

impl BookForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace one field, leaving the others untouched
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.title,
            FormField::Author => &self.author,
            FormField::Category => &self.category,
            FormField::PublishedYear => &self.published_year,
            FormField::AvailableCopies => &self.available_copies,
        }
    }

    fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Title => &mut self.title,
            FormField::Author => &mut self.author,
            FormField::Category => &mut self.category,
            FormField::PublishedYear => &mut self.published_year,
            FormField::AvailableCopies => &mut self.available_copies,
        }
    }

    /// Build the create request; numeric text is coerced, never validated
    pub fn to_new_book(&self) -> NewBook {
        NewBook {
            title: self.title.clone(),
            author: self.author.clone(),
            category: self.category.clone(),
            published_year: Numeric::coerce(&self.published_year),
            available_copies: Numeric::coerce(&self.available_copies),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        FormField::ALL.iter().all(|field| self.get(*field).is_empty())
    }
}
