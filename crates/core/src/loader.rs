use std::path::PathBuf;

use crossbeam_channel::Sender;

use crate::error::{FundmapError, Result};
use crate::model::RawNode;

pub const DEFAULT_SOURCE: &str = "kickstarter-funding-data.json";

/// Where the document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    Url(String),
}

impl Source {
    pub fn parse(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            Source::Url(s.to_string())
        } else {
            Source::Path(PathBuf::from(s))
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Path(p) => write!(f, "{}", p.display()),
            Source::Url(u) => f.write_str(u),
        }
    }
}

#[derive(Debug, Clone)]
pub enum LoadMsg {
    Done(RawNode),
    Error(String),
}

pub fn load(source: &Source) -> Result<RawNode> {
    let body = match source {
        Source::Path(path) => std::fs::read_to_string(path)
            .map_err(|e| FundmapError::Fetch(format!("{}: {e}", path.display())))?,
        Source::Url(url) => fetch_url(url)?,
    };
    RawNode::from_json_str(&body)
}

/// The fetch has no deadline; a slow server just delays the render.
fn http_client() -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(None::<std::time::Duration>)
        .build()
        .map_err(|e| FundmapError::Fetch(e.to_string()))
}

fn fetch_url(url: &str) -> Result<String> {
    let client = http_client()?;
    let resp = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| FundmapError::Fetch(format!("{url}: {e}")))?;
    resp.text()
        .map_err(|e| FundmapError::Fetch(format!("{url}: {e}")))
}

/// Loads on a worker thread and reports exactly one message.
pub fn spawn_load(source: Source, tx: Sender<LoadMsg>) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let msg = match load(&source) {
            Ok(raw) => {
                tracing::debug!(%source, "document loaded");
                LoadMsg::Done(raw)
            }
            Err(e) => {
                tracing::error!(%source, error = %e, "failed to load document");
                LoadMsg::Error(e.to_string())
            }
        };
        let _ = tx.send(msg);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_source_kind() {
        assert_eq!(
            Source::parse("https://example.org/data.json"),
            Source::Url("https://example.org/data.json".into())
        );
        assert_eq!(
            Source::parse("data.json"),
            Source::Path(PathBuf::from("data.json"))
        );
    }

    #[test]
    fn http_client_builds_without_deadline() {
        assert!(http_client().is_ok());
    }

    #[test]
    fn loads_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            r#"{{"name":"root","children":[{{"name":"Games","children":[{{"name":"Dice","category":"Games","value":"12"}}]}}]}}"#
        )
        .unwrap();
        let raw = load(&Source::Path(f.path().to_path_buf())).unwrap();
        assert_eq!(raw.name, "root");
        assert_eq!(raw.children.as_ref().map(|c| c.len()), Some(1));
    }

    #[test]
    fn missing_file_is_a_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&Source::Path(dir.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, FundmapError::Fetch(_)));
    }

    #[test]
    fn worker_reports_failure_over_channel() {
        let (tx, rx) = crossbeam_channel::unbounded();
        spawn_load(Source::Path(PathBuf::from("/definitely/not/here.json")), tx)
            .join()
            .unwrap();
        assert!(matches!(rx.recv().unwrap(), LoadMsg::Error(_)));
    }
}
