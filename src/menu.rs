//! Interactive numbered menu.
//!
//! Reads choices line by line, runs the matching catalog operation and prints
//! the result. A failed operation is reported and the menu returns to idle;
//! only I/O failures on the terminal end the loop.

use anyhow::Result;
use core_library::models::Author;
use core_library::query::{AuthorBookCount, BookListItem, LanguageCount};
use core_service::{CatalogService, CoreError, IngestOutcome, IngestReport, SUPPORTED_LANGUAGES};
use std::io::{BufRead, Write};
use tracing::warn;

const RULE: &str = "----------------------------------------";

/// Menu entries, numbered as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    RegisterByTitle,
    ListBooks,
    ListAuthors,
    AuthorsAliveInYear,
    BooksByLanguage,
    BooksByAuthor,
    CountByLanguage,
    TopDownloads,
    RegisterByAuthor,
    CountByAuthor,
    Exit,
}

/// Why a menu choice could not be understood
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceError {
    NotANumber,
    OutOfRange(i64),
}

impl MenuOption {
    pub const ALL: [MenuOption; 11] = [
        MenuOption::RegisterByTitle,
        MenuOption::ListBooks,
        MenuOption::ListAuthors,
        MenuOption::AuthorsAliveInYear,
        MenuOption::BooksByLanguage,
        MenuOption::BooksByAuthor,
        MenuOption::CountByLanguage,
        MenuOption::TopDownloads,
        MenuOption::RegisterByAuthor,
        MenuOption::CountByAuthor,
        MenuOption::Exit,
    ];

    pub fn number(self) -> u8 {
        match self {
            MenuOption::RegisterByTitle => 1,
            MenuOption::ListBooks => 2,
            MenuOption::ListAuthors => 3,
            MenuOption::AuthorsAliveInYear => 4,
            MenuOption::BooksByLanguage => 5,
            MenuOption::BooksByAuthor => 6,
            MenuOption::CountByLanguage => 7,
            MenuOption::TopDownloads => 8,
            MenuOption::RegisterByAuthor => 9,
            MenuOption::CountByAuthor => 10,
            MenuOption::Exit => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuOption::RegisterByTitle => "Search a book by title",
            MenuOption::ListBooks => "List registered books",
            MenuOption::ListAuthors => "List registered authors",
            MenuOption::AuthorsAliveInYear => "List authors alive in a given year",
            MenuOption::BooksByLanguage => "List books by language",
            MenuOption::BooksByAuthor => "Find registered books by author",
            MenuOption::CountByLanguage => "Count books by language",
            MenuOption::TopDownloads => "Top 10 most downloaded books",
            MenuOption::RegisterByAuthor => "Register all books of an author",
            MenuOption::CountByAuthor => "Count books by author",
            MenuOption::Exit => "Exit",
        }
    }

    pub fn parse(input: &str) -> std::result::Result<Self, ChoiceError> {
        let number: i64 = input
            .trim()
            .parse()
            .map_err(|_| ChoiceError::NotANumber)?;

        Self::ALL
            .iter()
            .copied()
            .find(|option| i64::from(option.number()) == number)
            .ok_or(ChoiceError::OutOfRange(number))
    }
}

pub fn render_menu() -> String {
    let mut menu = format!("{RULE}\nLiteralura book catalog\n{RULE}\nChoose an option by number:\n");
    for option in MenuOption::ALL {
        menu.push_str(&format!("{} - {}\n", option.number(), option.label()));
    }
    menu.push_str(RULE);
    menu
}

pub fn render_downloads(count: Option<f64>) -> String {
    match count {
        None => "unknown".to_string(),
        Some(value) if value.fract() == 0.0 => format!("{:.0}", value),
        Some(value) => value.to_string(),
    }
}

pub fn render_book(item: &BookListItem) -> String {
    format!(
        "{RULE}\nTitle: {}\nAuthor: {}\nLanguage: {}\nDownloads: {}\n{RULE}",
        item.book.title,
        item.author_name,
        item.book.language,
        render_downloads(item.book.download_count)
    )
}

pub fn render_author(author: &Author) -> String {
    let year = |value: Option<i32>| value.map_or_else(|| "?".to_string(), |y| y.to_string());
    format!(
        "Author: {} ({} - {})",
        author.name,
        year(author.birth_year),
        year(author.death_year)
    )
}

/// Ranked listing, numbered from 1.
pub fn render_ranking(items: &[BookListItem]) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            format!(
                "{}. Title: {} | Downloads: {}",
                index + 1,
                item.book.title,
                render_downloads(item.book.download_count)
            )
        })
        .collect()
}

pub fn render_language_count(count: &LanguageCount) -> String {
    format!("Language: {} - Total: {}", count.language, count.total)
}

pub fn render_author_count(count: &AuthorBookCount) -> String {
    format!("Author: {} - Total books: {}", count.author_name, count.total)
}

pub fn render_error(err: &CoreError) -> String {
    match err {
        CoreError::NotFound(_) => "Book not found in the search service.".to_string(),
        CoreError::Validation(message) => format!("Invalid input: {}", message),
        CoreError::SearchUnavailable(_) => {
            "The search service is unavailable right now. Please try again later.".to_string()
        }
        CoreError::MalformedResponse(_) => {
            "The search service sent a response that could not be read.".to_string()
        }
        CoreError::Store(_) => "The catalog database reported an error.".to_string(),
    }
}

/// The menu loop over a line-oriented input and an output sink.
pub struct Menu<'a, R, W> {
    service: &'a CatalogService,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(service: &'a CatalogService, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    /// Run until the user picks Exit or the input ends.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "\n{}", render_menu())?;
            let Some(line) = self.prompt("Enter your option: ")? else {
                break;
            };

            let option = match MenuOption::parse(&line) {
                Ok(option) => option,
                Err(ChoiceError::NotANumber) => {
                    writeln!(self.output, "Invalid input. Please enter a number.")?;
                    continue;
                }
                Err(ChoiceError::OutOfRange(number)) => {
                    writeln!(
                        self.output,
                        "Invalid option {}. Please choose an option from 0 to 10.",
                        number
                    )?;
                    continue;
                }
            };

            if option == MenuOption::Exit {
                writeln!(self.output, "Closing the catalog...")?;
                break;
            }

            if let Err(err) = self.dispatch(option).await {
                match err.downcast_ref::<CoreError>() {
                    Some(core) => {
                        warn!(error = %core, option = option.number(), "Menu action failed");
                        writeln!(self.output, "\n{}", render_error(core))?;
                    }
                    None => return Err(err),
                }
            }
        }

        self.output.flush()?;
        Ok(())
    }

    async fn dispatch(&mut self, option: MenuOption) -> Result<()> {
        match option {
            MenuOption::RegisterByTitle => self.register_by_title().await,
            MenuOption::ListBooks => {
                let books = self.service.list_books().await?;
                self.show_books("Registered books", &books, "No books registered yet.")
            }
            MenuOption::ListAuthors => self.list_authors().await,
            MenuOption::AuthorsAliveInYear => self.authors_alive().await,
            MenuOption::BooksByLanguage => self.books_by_language().await,
            MenuOption::BooksByAuthor => self.books_by_author().await,
            MenuOption::CountByLanguage => self.count_by_language().await,
            MenuOption::TopDownloads => self.top_downloads().await,
            MenuOption::RegisterByAuthor => self.register_by_author().await,
            MenuOption::CountByAuthor => self.count_by_author().await,
            MenuOption::Exit => Ok(()),
        }
    }

    async fn register_by_title(&mut self) -> Result<()> {
        let Some(title) = self.prompt("Enter the title of the book to search for: ")? else {
            return Ok(());
        };

        let outcome = self.service.register_by_title(&title).await?;
        writeln!(self.output, "\n{RULE}")?;
        match &outcome {
            IngestOutcome::AlreadyPresent { .. } => {
                writeln!(self.output, "This book is already registered.")?
            }
            IngestOutcome::Registered { .. } => {
                writeln!(self.output, "Book registered successfully:")?;
                if let Some(item) = self.service.find_book(outcome.title()).await? {
                    writeln!(self.output, "{}", render_book(&item))?;
                }
            }
            IngestOutcome::Failed { .. } => writeln!(self.output, "{}", outcome)?,
        }
        writeln!(self.output, "{RULE}")?;
        Ok(())
    }

    async fn register_by_author(&mut self) -> Result<()> {
        let Some(author) =
            self.prompt("Enter the author name to register all of their books: ")?
        else {
            return Ok(());
        };

        let report = self.service.register_by_author(&author).await?;
        self.show_report(author.trim(), &report)
    }

    async fn list_authors(&mut self) -> Result<()> {
        let authors = self.service.list_authors().await?;
        if authors.is_empty() {
            writeln!(self.output, "\nNo authors registered yet.")?;
            return Ok(());
        }

        writeln!(self.output, "\n{RULE}\n  Registered authors\n{RULE}")?;
        for author in &authors {
            writeln!(self.output, "{}", render_author(author))?;
        }
        writeln!(self.output, "{RULE}")?;
        Ok(())
    }

    async fn authors_alive(&mut self) -> Result<()> {
        let Some(raw) = self.prompt("Enter the year to check for living authors: ")? else {
            return Ok(());
        };
        let Ok(year) = raw.trim().parse::<i32>() else {
            writeln!(self.output, "Invalid input. Please enter a year as a number.")?;
            return Ok(());
        };

        let authors = self.service.authors_alive_in_year(year).await?;
        if authors.is_empty() {
            writeln!(self.output, "No registered authors were alive in {}.", year)?;
        } else {
            for author in &authors {
                writeln!(self.output, "{}", render_author(author))?;
            }
        }
        Ok(())
    }

    async fn books_by_language(&mut self) -> Result<()> {
        writeln!(
            self.output,
            "Enter the language to list books for:\nes -> Spanish\nen -> English\nfr -> French\npt -> Portuguese"
        )?;
        let Some(language) = self.prompt("Option: ")? else {
            return Ok(());
        };

        match self.service.books_by_language(&language).await {
            Ok(books) => {
                self.show_books("Books by language", &books, "No books registered in that language.")
            }
            Err(CoreError::Validation(_)) => {
                writeln!(
                    self.output,
                    "Unsupported language. Please choose one of: {}.",
                    SUPPORTED_LANGUAGES.join(", ")
                )?;
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn books_by_author(&mut self) -> Result<()> {
        writeln!(
            self.output,
            "Use the format «Last name, First name». Example: Austen, Jane"
        )?;
        let Some(fragment) = self.prompt("Enter the author name to search for: ")? else {
            return Ok(());
        };

        let books = self.service.books_by_author_name(&fragment).await?;
        let heading = format!("Books by author: {}", fragment.trim());
        self.show_books(&heading, &books, "No books found for that author.")
    }

    async fn count_by_language(&mut self) -> Result<()> {
        let counts = self.service.count_books_by_language().await?;
        if counts.is_empty() {
            writeln!(self.output, "\nNo books registered yet.")?;
            return Ok(());
        }

        writeln!(self.output, "\n{RULE}\n  Books per language\n{RULE}")?;
        for count in &counts {
            writeln!(self.output, "{}", render_language_count(count))?;
        }
        writeln!(self.output, "{RULE}")?;
        Ok(())
    }

    async fn top_downloads(&mut self) -> Result<()> {
        let books = self.service.top10_by_downloads().await?;
        writeln!(self.output, "\n{RULE}\n  Top 10 most downloaded books\n{RULE}")?;
        for line in render_ranking(&books) {
            writeln!(self.output, "{}", line)?;
        }
        writeln!(self.output, "{RULE}")?;
        Ok(())
    }

    async fn count_by_author(&mut self) -> Result<()> {
        let counts = self.service.count_books_by_author().await?;
        writeln!(self.output, "\n{RULE}\n  Books per author\n{RULE}")?;
        if counts.is_empty() {
            writeln!(self.output, "No books registered yet.")?;
        }
        for count in &counts {
            writeln!(self.output, "{}", render_author_count(count))?;
        }
        writeln!(self.output, "{RULE}")?;
        Ok(())
    }

    fn show_books(&mut self, heading: &str, books: &[BookListItem], empty: &str) -> Result<()> {
        if books.is_empty() {
            writeln!(self.output, "\n{}", empty)?;
            return Ok(());
        }

        writeln!(self.output, "\n{RULE}\n  {}\n{RULE}", heading)?;
        for item in books {
            writeln!(self.output, "{}", render_book(item))?;
        }
        Ok(())
    }

    fn show_report(&mut self, query: &str, report: &IngestReport) -> Result<()> {
        writeln!(self.output, "\n{RULE}")?;
        if report.is_empty() {
            writeln!(self.output, "No books found for: {}", query)?;
            writeln!(self.output, "{RULE}")?;
            return Ok(());
        }

        writeln!(
            self.output,
            "Found {} books for {}. Registering...",
            report.len(),
            query
        )?;
        for outcome in report.iter() {
            writeln!(self.output, "  -> {}", outcome)?;
        }
        writeln!(
            self.output,
            "{RULE}\nDone: {} registered, {} already present, {} failed.\n{RULE}",
            report.registered(),
            report.already_present(),
            report.failed()
        )?;
        Ok(())
    }

    /// Print `message` and read one line. `None` at end of input.
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
