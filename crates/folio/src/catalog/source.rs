//! Catalog sources and the one-shot catalog load.
//!
//! A catalog is read once at startup from a JSON or CSV document, either on
//! disk or over HTTP. [`load_catalog`] never fails: a broken source is
//! logged and leaves the session with an empty catalog.

use std::io::Read;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use super::item::{Catalog, Item, ItemId};
use crate::config::{CatalogConfig, BUNDLED_CATALOG};
use crate::error::{Error, Result};

/// Document format of a catalog source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    /// A JSON array of item records.
    Json,
    /// A CSV file with `ISBN,Title,Author,Genre,ImageURL,Rating` headers.
    Csv {
        /// Rows read before the rest of the file is ignored.
        max_rows: usize,
    },
}

impl CatalogFormat {
    /// Pick the format from the file extension of `location`.
    #[must_use]
    pub fn detect(location: &str, csv_max_rows: usize) -> Self {
        let is_csv = Path::new(location.split(['?', '#']).next().unwrap_or(location))
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            Self::Csv {
                max_rows: csv_max_rows,
            }
        } else {
            Self::Json
        }
    }

    /// Decode a catalog document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON or CSV.
    pub fn decode(self, bytes: &[u8]) -> Result<Vec<Item>> {
        match self {
            Self::Json => Ok(serde_json::from_slice(bytes)?),
            Self::Csv { max_rows } => parse_csv(bytes, max_rows),
        }
    }
}

/// Somewhere a catalog can be fetched from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Human-readable location, for logs and status output.
    fn describe(&self) -> String;

    /// Fetch and decode the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is unreachable or malformed.
    async fn fetch(&self) -> Result<Vec<Item>>;
}

/// A catalog document on the local file system.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    format: CatalogFormat,
}

impl FileSource {
    /// Create a file source; the format follows the file extension.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, csv_max_rows: usize) -> Self {
        let path = path.into();
        let format = CatalogFormat::detect(&path.to_string_lossy(), csv_max_rows);
        Self { path, format }
    }
}

#[async_trait]
impl CatalogSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Vec<Item>> {
        debug!("Reading catalog from {}", self.path.display());
        let bytes = tokio::fs::read(&self.path).await?;
        self.format.decode(&bytes)
    }
}

/// The sample catalog shipped inside the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledSource;

impl BundledSource {
    const DOCUMENT: &'static str = include_str!("../../data/books-sample.json");
}

#[async_trait]
impl CatalogSource for BundledSource {
    fn describe(&self) -> String {
        BUNDLED_CATALOG.to_string()
    }

    async fn fetch(&self) -> Result<Vec<Item>> {
        CatalogFormat::Json.decode(Self::DOCUMENT.as_bytes())
    }
}

/// A catalog document served over HTTP(S), fetched with a single GET.
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    format: CatalogFormat,
    client: reqwest::Client,
}

impl HttpSource {
    /// Create an HTTP source; the format follows the URL path extension.
    #[must_use]
    pub fn new(url: impl Into<String>, csv_max_rows: usize) -> Self {
        Self::with_client(url, csv_max_rows, reqwest::Client::new())
    }

    /// Create an HTTP source that sends its request through `client`.
    #[must_use]
    pub fn with_client(
        url: impl Into<String>,
        csv_max_rows: usize,
        client: reqwest::Client,
    ) -> Self {
        let url = url.into();
        let format = CatalogFormat::detect(&url, csv_max_rows);
        Self {
            url,
            format,
            client,
        }
    }
}

#[async_trait]
impl CatalogSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<Vec<Item>> {
        debug!("Fetching catalog from {}", self.url);
        let resp = self.client.get(&self.url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::catalog_load(
                &self.url,
                format!("HTTP error! status: {status}"),
            ));
        }

        let bytes = resp.bytes().await?;
        self.format.decode(&bytes)
    }
}

/// Choose a source for `location`: URLs go over HTTP, [`BUNDLED_CATALOG`]
/// is the built-in sample, anything else is a path.
#[must_use]
pub fn source_for(location: &str, config: &CatalogConfig) -> Box<dyn CatalogSource> {
    if location == BUNDLED_CATALOG {
        Box::new(BundledSource)
    } else if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpSource::new(location, config.csv_max_rows))
    } else {
        Box::new(FileSource::new(location, config.csv_max_rows))
    }
}

/// How the catalog load ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// The catalog is available.
    Loaded,
    /// The source failed; the catalog is empty.
    Failed {
        /// Why the load failed.
        reason: String,
    },
}

/// A catalog together with the outcome of loading it.
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    /// The catalog; empty if the load failed.
    pub catalog: Catalog,
    /// Outcome of the load.
    pub status: LoadStatus,
}

/// Load the catalog from `source` once.
///
/// Never retries and never fails: on error the reason is logged and an
/// empty catalog is returned with [`LoadStatus::Failed`].
pub async fn load_catalog(source: &dyn CatalogSource) -> LoadedCatalog {
    let location = source.describe();
    match source.fetch().await {
        Ok(items) => {
            info!(count = items.len(), "Loaded catalog from {location}");
            LoadedCatalog {
                catalog: Catalog::new(items),
                status: LoadStatus::Loaded,
            }
        }
        Err(err) => {
            error!("Error loading books from {location}: {err}");
            LoadedCatalog {
                catalog: Catalog::empty(),
                status: LoadStatus::Failed {
                    reason: err.to_string(),
                },
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "ISBN", default)]
    isbn: String,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Author", default)]
    author: String,
    #[serde(rename = "Genre", default)]
    genre: String,
    #[serde(rename = "ImageURL", default)]
    image_url: Option<String>,
    #[serde(rename = "Rating", default)]
    rating: Option<String>,
}

/// Parse a CSV catalog.
///
/// Reads at most `max_rows` data rows. Ids are assigned from the row
/// position (starting at 1) before incomplete rows, those missing a title,
/// author or genre, are dropped.
///
/// # Errors
///
/// Returns an error if the header row cannot be read.
pub fn parse_csv(reader: impl Read, max_rows: usize) -> Result<Vec<Item>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    rdr.headers()?;

    let mut items = Vec::new();
    for (idx, row) in rdr.deserialize::<CsvRow>().take(max_rows).enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                warn!(row = idx + 1, "Skipping malformed CSV row: {err}");
                continue;
            }
        };

        if row.title.is_empty() || row.author.is_empty() || row.genre.is_empty() {
            continue;
        }

        let id = ItemId::try_from(idx + 1).unwrap_or(ItemId::MAX);
        items.push(Item {
            id,
            isbn: row.isbn,
            title: row.title,
            author: row.author,
            category: row.genre,
            image_ref: row.image_url.filter(|url| !url.is_empty()),
            rating_text: Some(row.rating.unwrap_or_default()),
        });
    }

    debug!(count = items.len(), "Parsed CSV catalog");
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_JSON: &str = r#"[
        {"id": 1, "isbn": "", "title": "The Hobbit", "author": "J.R.R. Tolkien", "genre": "Fantasy", "cover": "/covers/hobbit.jpg"},
        {"id": 2, "isbn": "", "title": "1984", "author": "George Orwell", "genre": "Dystopian"}
    ]"#;

    struct FailingSource;

    #[async_trait]
    impl CatalogSource for FailingSource {
        fn describe(&self) -> String {
            "unreachable".to_string()
        }

        async fn fetch(&self) -> Result<Vec<Item>> {
            Err(Error::catalog_load("unreachable", "connection refused"))
        }
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(CatalogFormat::detect("books.json", 200), CatalogFormat::Json);
        assert_eq!(CatalogFormat::detect("books", 200), CatalogFormat::Json);
        assert_eq!(
            CatalogFormat::detect("data/BOOKS.CSV", 50),
            CatalogFormat::Csv { max_rows: 50 }
        );
        assert_eq!(
            CatalogFormat::detect("https://example.com/books.csv?v=2", 10),
            CatalogFormat::Csv { max_rows: 10 }
        );
    }

    #[test]
    fn test_decode_json() {
        let items = CatalogFormat::Json.decode(SAMPLE_JSON.as_bytes()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "The Hobbit");
        assert_eq!(items[1].category, "Dystopian");
    }

    #[test]
    fn test_decode_malformed_json() {
        let result = CatalogFormat::Json.decode(b"{not json");
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_parse_csv_drops_incomplete_rows_and_keeps_position_ids() {
        let csv = "\
ISBN,Title,Author,Genre,ImageURL,Rating
111,Dune,Frank Herbert,Science Fiction,/covers/dune.jpg,4.3
222,,Nobody,Mystery,,
333,Emma,Jane Austen,Classic,,3.9
";
        let items = parse_csv(csv.as_bytes(), 200).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, 1);
        assert_eq!(items[0].image_ref.as_deref(), Some("/covers/dune.jpg"));
        assert_eq!(items[0].rating_text.as_deref(), Some("4.3"));
        assert_eq!(items[1].id, 3);
        assert_eq!(items[1].title, "Emma");
        assert!(items[1].image_ref.is_none());
    }

    #[test]
    fn test_parse_csv_without_optional_columns() {
        let csv = "ISBN,Title,Author,Genre\n1,Beloved,Toni Morrison,Literary\n";
        let items = parse_csv(csv.as_bytes(), 200).unwrap();

        assert_eq!(items.len(), 1);
        assert!(items[0].image_ref.is_none());
        assert_eq!(items[0].rating_text.as_deref(), Some(""));
    }

    #[test]
    fn test_parse_csv_respects_max_rows() {
        let mut csv = String::from("ISBN,Title,Author,Genre\n");
        for i in 0..10 {
            csv.push_str(&format!("{i},Book {i},Author {i},Genre\n"));
        }

        let items = parse_csv(csv.as_bytes(), 4).unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items.last().map(|item| item.id), Some(4));
    }

    #[tokio::test]
    async fn test_load_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.json");
        std::fs::write(&path, SAMPLE_JSON).unwrap();

        let loaded = load_catalog(&FileSource::new(&path, 200)).await;
        assert_eq!(loaded.status, LoadStatus::Loaded);
        assert_eq!(loaded.catalog.len(), 2);
        assert_eq!(loaded.catalog.genres(), ["Dystopian", "Fantasy"]);
    }

    #[tokio::test]
    async fn test_load_from_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.csv");
        std::fs::write(&path, "ISBN,Title,Author,Genre\n1,Dune,Frank Herbert,SF\n").unwrap();

        let loaded = load_catalog(&FileSource::new(&path, 200)).await;
        assert_eq!(loaded.status, LoadStatus::Loaded);
        assert_eq!(loaded.catalog.items()[0].title, "Dune");
    }

    #[tokio::test]
    async fn test_missing_file_leaves_catalog_empty() {
        let loaded = load_catalog(&FileSource::new("/nonexistent/books.json", 200)).await;
        assert!(loaded.catalog.is_empty());
        assert!(matches!(loaded.status, LoadStatus::Failed { .. }));
    }

    #[tokio::test]
    async fn test_failed_source_leaves_catalog_empty() {
        let loaded = load_catalog(&FailingSource).await;
        assert!(loaded.catalog.is_empty());
        match loaded.status {
            LoadStatus::Failed { reason } => assert!(reason.contains("connection refused")),
            LoadStatus::Loaded => panic!("expected failure"),
        }
    }

    /// Serve a single HTTP response on a local port and return its URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        });
        format!("http://{addr}/books.json")
    }

    fn local_source(url: &str) -> HttpSource {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        HttpSource::with_client(url, 200, client)
    }

    #[tokio::test]
    async fn test_http_source_loads_catalog() {
        let url = serve_once("200 OK", SAMPLE_JSON).await;

        let loaded = load_catalog(&local_source(&url)).await;
        assert_eq!(loaded.status, LoadStatus::Loaded);
        assert_eq!(loaded.catalog.len(), 2);
        assert_eq!(loaded.catalog.items()[0].title, "The Hobbit");
    }

    #[tokio::test]
    async fn test_http_error_status_leaves_catalog_empty() {
        let url = serve_once("404 Not Found", "not here").await;

        let loaded = load_catalog(&local_source(&url)).await;
        assert!(loaded.catalog.is_empty());
        match loaded.status {
            LoadStatus::Failed { reason } => assert!(reason.contains("404")),
            LoadStatus::Loaded => panic!("expected failure"),
        }
    }

    #[test]
    fn test_source_for_picks_transport() {
        let config = CatalogConfig::default();
        assert_eq!(
            source_for("https://example.com/books.json", &config).describe(),
            "https://example.com/books.json"
        );
        assert_eq!(
            source_for("/srv/books.json", &config).describe(),
            "/srv/books.json"
        );
        assert_eq!(
            source_for(BUNDLED_CATALOG, &config).describe(),
            BUNDLED_CATALOG
        );
    }

    #[tokio::test]
    async fn test_default_source_is_bundled_sample() {
        let config = crate::Config::default();
        let source = source_for(&config.catalog_source(), &config.catalog);

        let loaded = load_catalog(source.as_ref()).await;
        assert_eq!(loaded.status, LoadStatus::Loaded);
        assert_eq!(loaded.catalog.len(), 10);
        assert!(loaded.catalog.genres().iter().any(|genre| genre == "Fantasy"));
    }
}
