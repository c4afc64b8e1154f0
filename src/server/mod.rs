// src/server/mod.rs
use percent_encoding::percent_decode_str;
use std::net::SocketAddr;
use tracing::{debug, info};
use warp::{reply::Json, Filter, Rejection, Reply};

use crate::query::{PageRequest, QueryService, DEFAULT_LIMIT, DEFAULT_OFFSET};

/// Decoded query string, in arrival order.
pub type QueryPairs = Vec<(String, String)>;

pub const SERVICE_NAME: &str = "retail-sales-api";

/// First value for `key`, like most web frameworks' single-value lookup.
fn first<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn int_or(pairs: &[(String, String)], key: &str, default: i64) -> i64 {
    first(pairs, key)
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(default)
}

/// `offset`/`limit` from the query string; anything unusable falls back to the defaults.
pub fn page_request(pairs: &[(String, String)]) -> PageRequest {
    PageRequest {
        offset: int_or(pairs, "offset", DEFAULT_OFFSET),
        limit: int_or(pairs, "limit", DEFAULT_LIMIT),
    }
}

/// Percent-decode a raw path segment. `+` stays a literal plus.
pub fn decode_segment(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

fn with_service(
    service: QueryService,
) -> impl Filter<Extract = (QueryService,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || service.clone())
}

fn query_pairs() -> impl Filter<Extract = (QueryPairs,), Error = std::convert::Infallible> + Clone {
    // a query string that fails to decode is treated as empty
    warp::query::<QueryPairs>()
        .or(warp::any().map(QueryPairs::new))
        .unify()
}

fn health(service: QueryService) -> Json {
    warp::reply::json(&serde_json::json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "records": service.dataset().len(),
    }))
}

fn list_items(service: QueryService, pairs: QueryPairs) -> Json {
    let req = page_request(&pairs);
    debug!(?req, "list items");
    warp::reply::json(&service.list_all(req))
}

fn items_by_type(service: QueryService, pairs: QueryPairs) -> Json {
    let req = page_request(&pairs);
    let item_type = first(&pairs, "type").unwrap_or_default();
    debug!(?req, item_type, "items by type");
    warp::reply::json(&service.filter_by_category(item_type, req))
}

fn items_by_supplier(raw_supplier: String, service: QueryService, pairs: QueryPairs) -> Json {
    let req = page_request(&pairs);
    let supplier = decode_segment(&raw_supplier);
    debug!(?req, supplier = %supplier, "items by supplier");
    warp::reply::json(&service.filter_by_supplier(&supplier, req))
}

/// The full route table:
///
/// - `GET /health`
/// - `GET /items?limit&offset`
/// - `GET /items/type?type&limit&offset`
/// - `GET /supplier/{supplier}?limit&offset`
pub fn routes(
    service: QueryService,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let health_route = warp::path!("health")
        .and(warp::get())
        .and(with_service(service.clone()))
        .map(health);

    let items = warp::path!("items")
        .and(warp::get())
        .and(with_service(service.clone()))
        .and(query_pairs())
        .map(list_items);

    let by_type = warp::path!("items" / "type")
        .and(warp::get())
        .and(with_service(service.clone()))
        .and(query_pairs())
        .map(items_by_type);

    let by_supplier = warp::path!("supplier" / String)
        .and(warp::get())
        .and(with_service(service))
        .and(query_pairs())
        .map(items_by_supplier);

    health_route
        .or(items)
        .or(by_type)
        .or(by_supplier)
        .with(warp::trace::request())
}

/// Serve until the process is stopped.
pub async fn serve(service: QueryService, addr: SocketAddr) {
    info!(%addr, records = service.dataset().len(), "server starting");
    warp::serve(routes(service)).run(addr).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> QueryPairs {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn page_request_defaults_when_absent() {
        assert_eq!(page_request(&[]), PageRequest::default());
    }

    #[test]
    fn page_request_defaults_when_not_numeric() {
        let req = page_request(&pairs(&[("limit", "ten"), ("offset", ""), ("x", "1")]));
        assert_eq!(req, PageRequest { offset: 0, limit: 10 });

        let overflow = page_request(&pairs(&[("limit", "99999999999999999999")]));
        assert_eq!(overflow.limit, 10);
    }

    #[test]
    fn page_request_takes_first_value() {
        let req = page_request(&pairs(&[("limit", "3"), ("limit", "7"), ("offset", "-2")]));
        assert_eq!(req, PageRequest { offset: -2, limit: 3 });
    }

    #[tokio::test]
    async fn query_pairs_keep_arrival_order() {
        let got = warp::test::request()
            .path("/items?limit=5&type=WINE&limit=7")
            .filter(&query_pairs())
            .await
            .unwrap();
        assert_eq!(got, pairs(&[("limit", "5"), ("type", "WINE"), ("limit", "7")]));

        let empty = warp::test::request()
            .path("/items")
            .filter(&query_pairs())
            .await
            .unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn decode_segment_handles_spaces_and_symbols() {
        assert_eq!(decode_segment("PWSWN%20INC"), "PWSWN INC");
        assert_eq!(decode_segment("E%20%26%20J%20GALLO"), "E & J GALLO");
        assert_eq!(decode_segment("A+B"), "A+B");
        assert_eq!(decode_segment("100%"), "100%");
    }
}
