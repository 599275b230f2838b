use http_body_util::{BodyExt, Empty};
use hyper::{body::Bytes, header, Method, Request, StatusCode, Uri};
use hyper_tls::HttpsConnector;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde::Deserialize;
use url::Url;

use crate::CheckerError;

/// One account as returned by the lookup endpoint.
///
/// Both fields are required; any other field in the response is ignored.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct LookupRecord {
    pub screen_name: String,
    pub protected: bool,
}

pub(crate) type HttpsClient = Client<HttpsConnector<HttpConnector>, Empty<Bytes>>;

const USER_AGENT: &str = concat!("tw-checker/", env!("CARGO_PKG_VERSION"));

pub(crate) fn build_client() -> HttpsClient {
    let https = HttpsConnector::new();
    Client::builder(TokioExecutor::new()).build::<_, Empty<Bytes>>(https)
}

fn lookup_uri(endpoint: &str, usernames: &[String]) -> Result<Uri, CheckerError> {
    let url = Url::parse_with_params(endpoint, &[("screen_name", usernames.join(","))])
        .map_err(|e| CheckerError::InvalidEndpoint(format!("{endpoint}: {e}")))?;

    url.as_str()
        .parse()
        .map_err(|e| CheckerError::InvalidEndpoint(format!("{url}: {e}")))
}

/// Issues one lookup for `usernames` and decodes the returned accounts.
///
/// The API silently leaves out names it cannot resolve, so the result may
/// be shorter than the request.
pub(crate) async fn fetch_lookup(
    client: &HttpsClient,
    endpoint: &str,
    bearer_token: &str,
    usernames: &[String],
) -> Result<Vec<LookupRecord>, CheckerError> {
    let uri = lookup_uri(endpoint, usernames)?;
    tracing::debug!(%uri, names = usernames.len(), "GET lookup");

    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {bearer_token}"))
        .header(header::USER_AGENT, USER_AGENT)
        .body::<Empty<Bytes>>(Empty::new())
        .map_err(|e| CheckerError::InvalidEndpoint(e.to_string()))?;

    let res = client.request(req).await.map_err(|e| {
        let detail = match std::error::Error::source(&e) {
            Some(source) => format!("{e}: {source}"),
            None => e.to_string(),
        };
        CheckerError::Transport(detail)
    })?;

    let status = res.status();
    tracing::debug!(%status, "lookup response");
    if status != StatusCode::OK {
        return Err(CheckerError::HttpStatus(status.to_string()));
    }

    let body = res
        .into_body()
        .collect()
        .await
        .map_err(|e| CheckerError::Transport(format!("failed to read response body: {e}")))?
        .to_bytes();

    let records: Vec<LookupRecord> = serde_json::from_slice(&body)?;
    tracing::debug!(returned = records.len(), "decoded lookup response");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_lookup_uri_joins_names() {
        let uri = lookup_uri(
            "https://api.twitter.com/1.1/users/lookup.json",
            &names(&["alice", "bob"]),
        )
        .unwrap();

        assert_eq!(uri.host(), Some("api.twitter.com"));
        assert_eq!(uri.path(), "/1.1/users/lookup.json");
        assert_eq!(uri.query(), Some("screen_name=alice%2Cbob"));
    }

    #[test]
    fn test_lookup_uri_rejects_bad_endpoint() {
        let err = lookup_uri("not a url", &names(&["alice"])).unwrap_err();
        assert!(matches!(err, CheckerError::InvalidEndpoint(_)));
    }

    #[test]
    fn test_record_ignores_unknown_fields() {
        let records: Vec<LookupRecord> = serde_json::from_str(
            r#"[{"id": 12, "screen_name": "alice", "protected": true, "name": "Alice"}]"#,
        )
        .unwrap();

        assert_eq!(
            records,
            vec![LookupRecord {
                screen_name: "alice".into(),
                protected: true,
            }]
        );
    }

    #[test]
    fn test_record_requires_protected_flag() {
        let parsed = serde_json::from_str::<Vec<LookupRecord>>(r#"[{"screen_name": "alice"}]"#);
        assert!(parsed.is_err());
    }
}
