//! High-level query API for the book catalog.
//!
//! Read-only listings, counts and rankings over the stored authors and books.
//! Book listings join the owning author so callers can display a book without
//! a second round-trip.

use crate::error::Result;
use crate::models::{Author, Book};
use crate::repositories::{AuthorRepository, SqliteAuthorRepository};
use serde::{Deserialize, Serialize};
use sqlx::{query_as, FromRow, SqlitePool};

/// Number of books returned by [`LibraryQueryService::top10_by_downloads`].
pub const TOP_DOWNLOADS_LIMIT: u32 = 10;

const BOOK_WITH_AUTHOR: &str = r#"
    SELECT b.*, a.name AS author_name
    FROM books b
    INNER JOIN authors a ON a.id = b.author_id
"#;

/// Item returned when listing books. Includes the base `Book` plus the
/// owning author's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BookListItem {
    #[sqlx(flatten)]
    pub book: Book,
    pub author_name: String,
}

/// Number of stored books sharing a language code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LanguageCount {
    pub language: String,
    pub total: i64,
}

/// Number of stored books owned by an author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AuthorBookCount {
    pub author_name: String,
    pub total: i64,
}

/// Query service over the catalog store. Every method is side-effect free.
pub struct LibraryQueryService {
    pool: SqlitePool,
    authors: SqliteAuthorRepository,
}

impl LibraryQueryService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            authors: SqliteAuthorRepository::new(pool.clone()),
            pool,
        }
    }

    /// Every stored book in insertion order.
    pub async fn list_all_books(&self) -> Result<Vec<BookListItem>> {
        let sql = format!("{BOOK_WITH_AUTHOR} ORDER BY b.id ASC");
        let books = query_as::<_, BookListItem>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    /// The stored book with exactly this title, with its author's name.
    pub async fn find_book_by_title(&self, title: &str) -> Result<Option<BookListItem>> {
        let sql = format!("{BOOK_WITH_AUTHOR} WHERE b.title = ?");
        let book = query_as::<_, BookListItem>(&sql)
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    /// Every stored author in insertion order.
    pub async fn list_all_authors(&self) -> Result<Vec<Author>> {
        self.authors.list_all().await
    }

    /// Authors born no later than `year` who died after it.
    pub async fn authors_alive_in_year(&self, year: i32) -> Result<Vec<Author>> {
        self.authors.alive_in_year(year).await
    }

    /// Books whose stored language equals `language`.
    ///
    /// The code is compared as given; callers decide which codes are valid.
    pub async fn books_by_language(&self, language: &str) -> Result<Vec<BookListItem>> {
        let sql = format!("{BOOK_WITH_AUTHOR} WHERE b.language = ? ORDER BY b.id ASC");
        let books = query_as::<_, BookListItem>(&sql)
            .bind(language)
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    /// Books whose author's name contains `fragment`.
    ///
    /// Matching follows SQLite `LIKE`: ASCII letters compare case-insensitively.
    /// `%` and `_` in the fragment match literally.
    pub async fn books_by_author_name_contains(
        &self,
        fragment: &str,
    ) -> Result<Vec<BookListItem>> {
        let sql = format!(
            r"{BOOK_WITH_AUTHOR} WHERE a.name LIKE '%' || ? || '%' ESCAPE '\' ORDER BY b.id ASC"
        );
        let books = query_as::<_, BookListItem>(&sql)
            .bind(escape_like(fragment))
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    /// Book count per language, largest first.
    pub async fn count_books_by_language(&self) -> Result<Vec<LanguageCount>> {
        let counts = query_as::<_, LanguageCount>(
            r#"
            SELECT language, COUNT(*) AS total
            FROM books
            GROUP BY language
            ORDER BY total DESC, language ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    /// Book count per author, largest first. Authors without books are
    /// omitted.
    pub async fn count_books_by_author(&self) -> Result<Vec<AuthorBookCount>> {
        let counts = query_as::<_, AuthorBookCount>(
            r#"
            SELECT a.name AS author_name, COUNT(b.id) AS total
            FROM authors a
            INNER JOIN books b ON b.author_id = a.id
            GROUP BY a.id, a.name
            ORDER BY total DESC, a.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    /// The `limit` most downloaded books, highest first. Books without a
    /// download count rank last.
    pub async fn top_by_downloads(&self, limit: u32) -> Result<Vec<BookListItem>> {
        let sql = format!(
            "{BOOK_WITH_AUTHOR} ORDER BY b.download_count DESC NULLS LAST, b.id ASC LIMIT ?"
        );
        let books = query_as::<_, BookListItem>(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    pub async fn top10_by_downloads(&self) -> Result<Vec<BookListItem>> {
        self.top_by_downloads(TOP_DOWNLOADS_LIMIT).await
    }
}

fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for ch in fragment.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;
    use crate::models::{NewAuthor, NewBook};
    use crate::repositories::{BookRepository, SqliteBookRepository};

    struct Fixture {
        authors: SqliteAuthorRepository,
        books: SqliteBookRepository,
        service: LibraryQueryService,
    }

    async fn setup() -> Fixture {
        let pool = create_test_pool().await.unwrap();
        Fixture {
            authors: SqliteAuthorRepository::new(pool.clone()),
            books: SqliteBookRepository::new(pool.clone()),
            service: LibraryQueryService::new(pool),
        }
    }

    impl Fixture {
        async fn add(
            &self,
            title: &str,
            language: &str,
            downloads: Option<f64>,
            author: (&str, Option<i32>, Option<i32>),
        ) {
            let author = self
                .authors
                .find_or_create(&NewAuthor::new(author.0, author.1, author.2))
                .await
                .unwrap()
                .into_inner();
            self.books
                .create_if_absent(&NewBook::new(title, language, downloads, author.id))
                .await
                .unwrap();
        }
    }

    const AUSTEN: (&str, Option<i32>, Option<i32>) = ("Austen, Jane", Some(1775), Some(1817));
    const HUGO: (&str, Option<i32>, Option<i32>) = ("Hugo, Victor", Some(1802), Some(1885));
    const CERVANTES: (&str, Option<i32>, Option<i32>) =
        ("Cervantes Saavedra, Miguel de", Some(1547), Some(1616));

    fn titles(items: &[BookListItem]) -> Vec<&str> {
        items.iter().map(|item| item.book.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_empty_catalog() {
        let f = setup().await;
        assert!(f.service.list_all_books().await.unwrap().is_empty());
        assert!(f.service.list_all_authors().await.unwrap().is_empty());
        assert!(f.service.count_books_by_language().await.unwrap().is_empty());
        assert!(f.service.count_books_by_author().await.unwrap().is_empty());
        assert!(f.service.top10_by_downloads().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_all_books_includes_author_name() {
        let f = setup().await;
        f.add("Pride and Prejudice", "en", Some(5000.0), AUSTEN).await;
        f.add("Emma", "en", Some(1200.0), AUSTEN).await;

        let books = f.service.list_all_books().await.unwrap();
        assert_eq!(titles(&books), vec!["Pride and Prejudice", "Emma"]);
        assert!(books.iter().all(|b| b.author_name == "Austen, Jane"));
        assert_eq!(books[0].book.author_id, books[1].book.author_id);

        let authors = f.service.list_all_authors().await.unwrap();
        assert_eq!(authors.len(), 1);

        let emma = f.service.find_book_by_title("Emma").await.unwrap().unwrap();
        assert_eq!(emma.author_name, "Austen, Jane");
        assert!(f.service.find_book_by_title("emma").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_authors_alive_in_year() {
        let f = setup().await;
        f.add("Dracula", "en", Some(9000.0), ("Stoker, Bram", Some(1847), Some(1912)))
            .await;
        f.add(
            "Frankenstein",
            "en",
            Some(8000.0),
            ("Shelley, Mary Wollstonecraft", Some(1797), Some(1851)),
        )
        .await;

        let alive = f.service.authors_alive_in_year(1850).await.unwrap();
        let names: Vec<&str> = alive.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Stoker, Bram", "Shelley, Mary Wollstonecraft"]);

        // Shelley died in 1851.
        let alive = f.service.authors_alive_in_year(1851).await.unwrap();
        let names: Vec<&str> = alive.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Stoker, Bram"]);

        let alive = f.service.authors_alive_in_year(1846).await.unwrap();
        let names: Vec<&str> = alive.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Shelley, Mary Wollstonecraft"]);

        let alive = f.service.authors_alive_in_year(1900).await.unwrap();
        assert_eq!(alive.len(), 1);
        assert_eq!(alive[0].name, "Stoker, Bram");
    }

    #[tokio::test]
    async fn test_books_by_language_exact_match() {
        let f = setup().await;
        f.add("Emma", "en", None, AUSTEN).await;
        f.add("Les Misérables", "fr", None, HUGO).await;
        f.add("Don Quijote", "es", None, CERVANTES).await;

        let french = f.service.books_by_language("fr").await.unwrap();
        assert_eq!(titles(&french), vec!["Les Misérables"]);
        assert_eq!(french[0].author_name, "Hugo, Victor");

        assert!(f.service.books_by_language("FR").await.unwrap().is_empty());
        assert!(f.service.books_by_language("pt").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_books_by_author_name_contains() {
        let f = setup().await;
        f.add("Emma", "en", None, AUSTEN).await;
        f.add("Persuasion", "en", None, AUSTEN).await;
        f.add("Notre-Dame de Paris", "fr", None, HUGO).await;

        let matches = f
            .service
            .books_by_author_name_contains("austen")
            .await
            .unwrap();
        assert_eq!(titles(&matches), vec!["Emma", "Persuasion"]);

        let matches = f.service.books_by_author_name_contains("Vic").await.unwrap();
        assert_eq!(titles(&matches), vec!["Notre-Dame de Paris"]);

        assert!(f
            .service
            .books_by_author_name_contains("Tolstoy")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_author_fragment_wildcards_are_literal() {
        let f = setup().await;
        f.add("Emma", "en", None, AUSTEN).await;

        assert!(f
            .service
            .books_by_author_name_contains("%")
            .await
            .unwrap()
            .is_empty());
        assert!(f
            .service
            .books_by_author_name_contains("A_sten")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_count_books_by_language_sums_to_total() {
        let f = setup().await;
        f.add("Emma", "en", None, AUSTEN).await;
        f.add("Persuasion", "en", None, AUSTEN).await;
        f.add("Les Misérables", "fr", None, HUGO).await;
        f.add("Don Quijote", "es", None, CERVANTES).await;
        f.add("Novelas ejemplares", "es", None, CERVANTES).await;
        f.add("La Galatea", "es", None, CERVANTES).await;

        let counts = f.service.count_books_by_language().await.unwrap();
        assert_eq!(
            counts,
            vec![
                LanguageCount { language: "es".into(), total: 3 },
                LanguageCount { language: "en".into(), total: 2 },
                LanguageCount { language: "fr".into(), total: 1 },
            ]
        );

        let total: i64 = counts.iter().map(|c| c.total).sum();
        let listed = f.service.list_all_books().await.unwrap().len() as i64;
        assert_eq!(total, listed);
    }

    #[tokio::test]
    async fn test_count_books_by_author_omits_authors_without_books() {
        let f = setup().await;
        f.add("Emma", "en", None, AUSTEN).await;
        f.add("Persuasion", "en", None, AUSTEN).await;
        f.add("Les Misérables", "fr", None, HUGO).await;
        f.authors
            .find_or_create(&NewAuthor::new("Unpublished, Nobody", None, None))
            .await
            .unwrap();

        let counts = f.service.count_books_by_author().await.unwrap();
        assert_eq!(
            counts,
            vec![
                AuthorBookCount { author_name: "Austen, Jane".into(), total: 2 },
                AuthorBookCount { author_name: "Hugo, Victor".into(), total: 1 },
            ]
        );
    }

    #[tokio::test]
    async fn test_top10_returns_fewer_when_catalog_is_small() {
        let f = setup().await;
        f.add("Emma", "en", Some(300.0), AUSTEN).await;
        f.add("Les Misérables", "fr", Some(900.0), HUGO).await;
        f.add("Don Quijote", "es", Some(600.0), CERVANTES).await;

        let top = f.service.top10_by_downloads().await.unwrap();
        assert_eq!(titles(&top), vec!["Les Misérables", "Don Quijote", "Emma"]);
    }

    #[tokio::test]
    async fn test_top10_caps_at_ten_and_ranks_unknown_last() {
        let f = setup().await;
        f.add("No Count", "en", None, AUSTEN).await;
        for i in 0..12 {
            f.add(&format!("Volume {i}"), "en", Some(f64::from(i) * 10.0), HUGO)
                .await;
        }

        let top = f.service.top10_by_downloads().await.unwrap();
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].book.title, "Volume 11");
        assert_eq!(top[9].book.title, "Volume 2");
        assert!(top
            .windows(2)
            .all(|w| w[0].book.download_count >= w[1].book.download_count));

        let all = f.service.top_by_downloads(20).await.unwrap();
        assert_eq!(all.len(), 13);
        assert_eq!(all[12].book.title, "No Count");
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("Austen"), "Austen");
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
