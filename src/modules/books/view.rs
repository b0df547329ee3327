//! Plain-text rendering of the books screen. Purely cosmetic.

use shelf_kernel::{Book, BooksApi};

use super::controller::BooksController;
use super::form::{BookForm, FormField};

pub const HEADING: &str = "Library Book Management";

const COLUMNS: [&str; 6] = ["#", "Title", "Author", "Category", "Year", "Copies"];

/// Render the full screen for the controller's current state
pub fn render<A: BooksApi>(controller: &BooksController<A>) -> String {
    render_parts(controller.books(), controller.form(), controller.error())
}

pub fn render_parts(books: &[Book], form: &BookForm, error: Option<&str>) -> String {
    let mut out = String::new();
    out.push_str(&format!("{HEADING}\n{}\n\n", "=".repeat(HEADING.len())));

    out.push_str(&render_form(form));
    if let Some(message) = error {
        out.push_str(&format!("! {message}\n"));
    }
    out.push('\n');

    out.push_str(&render_table(books));
    out
}

pub fn render_form(form: &BookForm) -> String {
    let width = FormField::ALL
        .iter()
        .map(|field| field.label().len())
        .max()
        .unwrap_or_default();

    let mut out = String::from("Add Book\n");
    for field in FormField::ALL {
        out.push_str(&format!("  {:<width$}  {}\n", field.label(), form.get(field)));
    }
    out
}

pub fn render_table(books: &[Book]) -> String {
    let mut out = String::from("Books\n");
    if books.is_empty() {
        out.push_str("  (no books)\n");
        return out;
    }

    let rows: Vec<[String; 6]> = books
        .iter()
        .enumerate()
        .map(|(index, book)| {
            [
                (index + 1).to_string(),
                book.title.clone(),
                book.author.clone(),
                book.category.clone(),
                book.published_year.to_string(),
                book.available_copies.to_string(),
            ]
        })
        .collect();

    let mut widths = COLUMNS.map(|column| column.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    push_row(&mut out, &COLUMNS, &widths);
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    push_row(&mut out, rule.as_slice(), &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad(cell.as_ref(), *width))
        .collect::<Vec<_>>()
        .join(" | ");
    out.push_str(&format!("  {}\n", line.trim_end()));
}

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.chars().count());
    format!("{cell}{}", " ".repeat(fill))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: &str, title: &str, copies: i64) -> Book {
        Book {
            id: id.to_string(),
            title: title.to_string(),
            author: "Ursula K. Le Guin".to_string(),
            category: "Sci-Fi".to_string(),
            published_year: 1969,
            available_copies: copies,
        }
    }

    #[test]
    fn empty_table_says_so() {
        assert_eq!(render_table(&[]), "Books\n  (no books)\n");
    }

    #[test]
    fn table_rows_are_numbered_in_order() {
        let table = render_table(&[
            book("x", "The Left Hand of Darkness", 3),
            book("y", "The Dispossessed", 0),
        ]);
        let lines: Vec<&str> = table.lines().collect();

        assert!(lines[1].starts_with("  # | Title"));
        assert!(lines[3].starts_with("  1 | The Left Hand of Darkness"));
        assert!(lines[4].starts_with("  2 | The Dispossessed"));
        assert!(lines[4].ends_with("| 0"));
    }

    #[test]
    fn screen_shows_error_under_form() {
        let mut form = BookForm::new();
        form.set(FormField::Title, "Dune");

        let screen = render_parts(&[], &form, Some("Invalid book data"));

        assert!(screen.starts_with(HEADING));
        assert!(screen.contains("Title             Dune"));
        assert!(screen.contains("! Invalid book data"));
    }

    #[test]
    fn heading_is_underlined_and_spaced() {
        let screen = render_parts(&[], &BookForm::new(), None);
        let lines: Vec<&str> = screen.lines().take(4).collect();

        assert_eq!(lines, [HEADING, "=======================", "", "Add Book"]);
    }

    #[test]
    fn screen_without_error_has_no_marker() {
        let screen = render_parts(&[], &BookForm::new(), None);
        assert!(!screen.contains("! "));
    }
}
