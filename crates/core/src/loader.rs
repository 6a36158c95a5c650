use crate::model::{Hierarchy, RawNode};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Url(Url),
    File(PathBuf),
}

impl DataSource {
    /// `http(s)://` locations are remote; anything else is a local path.
    pub fn parse(s: &str) -> Result<Self, LoadError> {
        if s.starts_with("http://") || s.starts_with("https://") {
            let url = Url::parse(s).map_err(|source| LoadError::InvalidUrl {
                url: s.to_string(),
                source,
            })?;
            Ok(DataSource::Url(url))
        } else {
            Ok(DataSource::File(PathBuf::from(s)))
        }
    }

    pub fn load(&self) -> Result<Hierarchy, LoadError> {
        match self {
            DataSource::Url(url) => fetch_dataset(url),
            DataSource::File(path) => load_file(path),
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Url(u) => write!(f, "{u}"),
            DataSource::File(p) => write!(f, "{}", p.display()),
        }
    }
}

/// One blocking GET; no retry.
pub fn fetch_dataset(url: &Url) -> Result<Hierarchy, LoadError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("salesmap/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .build()?;
    fetch_with(&client, url)
}

pub fn fetch_with(client: &reqwest::blocking::Client, url: &Url) -> Result<Hierarchy, LoadError> {
    tracing::info!(%url, "fetching dataset");
    let response = client
        .get(url.as_str())
        .header("Accept", "application/json")
        .send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let body = response.text()?;
    tracing::debug!(bytes = body.len(), "dataset received");
    parse_dataset(&body)
}

pub fn load_file(path: &Path) -> Result<Hierarchy, LoadError> {
    tracing::info!(path = %path.display(), "loading dataset");
    let body = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_dataset(&body)
}

/// Parse the JSON document and normalize it into a [`Hierarchy`].
pub fn parse_dataset(body: &str) -> Result<Hierarchy, LoadError> {
    let raw: RawNode = serde_json::from_str(body)?;
    Ok(Hierarchy::from_raw(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;

    /// Answer a single request with `response` and return the server's url.
    fn serve_once(response: &'static str) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                line.clear();
            }
            let mut stream = stream;
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
        });
        Url::parse(&format!("http://{addr}/sales.json")).unwrap()
    }

    /// Loopback client that ignores proxies set in the environment.
    fn fetch_local(url: &Url) -> Result<Hierarchy, LoadError> {
        let client = reqwest::blocking::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()?;
        fetch_with(&client, url)
    }

    #[test]
    fn non_success_status_is_an_error() {
        let url = serve_once("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        let err = fetch_local(&url).unwrap_err();
        assert!(matches!(err, LoadError::Status { status: 404, .. }), "{err:?}");
    }

    #[test]
    fn refused_connection_is_http_error() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let url = Url::parse(&format!("http://127.0.0.1:{port}/sales.json")).unwrap();
        let err = fetch_local(&url).unwrap_err();
        assert!(matches!(err, LoadError::Http(_)), "{err:?}");
    }

    #[test]
    fn fetches_and_normalizes_dataset() {
        const OK: &str = concat!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 89\r\nConnection: close\r\n\r\n",
            r#"{"name":"root","children":[{"name":"GB","children":[{"name":"Tetris","value":"30.26"}]}]}"#
        );
        let tree = fetch_local(&serve_once(OK)).unwrap();
        assert_eq!(tree.categories(), vec!["GB"]);
        assert_eq!(tree.total(), 30.26);
    }

    #[test]
    fn classifies_sources() {
        assert!(matches!(DataSource::parse("https://example.com/d.json"), Ok(DataSource::Url(_))));
        assert_eq!(
            DataSource::parse("data/sales.json").unwrap(),
            DataSource::File(PathBuf::from("data/sales.json"))
        );
        assert!(matches!(DataSource::parse("http://"), Err(LoadError::InvalidUrl { .. })));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(parse_dataset("{ not json"), Err(LoadError::Parse(_))));
        assert!(matches!(parse_dataset(r#"{ "children": [] }"#), Err(LoadError::Parse(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_file(Path::new("/nonexistent/sales.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
