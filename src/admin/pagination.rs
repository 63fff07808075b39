//! List pagination
//!
//! GCP list calls return at most one page of items plus a `nextPageToken`.
//! [`collect_pages`] keeps asking for the next page until the token runs
//! out and returns every item in the order the provider sent them.

use crate::error::Result;
use serde_json::Value;
use std::future::Future;

/// Next continuation token, if the response carries a non-empty one
pub fn next_page_token(response: &Value) -> Option<String> {
    response
        .get("nextPageToken")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Append `pageToken` to a list path
pub fn with_page_token(path: &str, page_token: Option<&str>) -> String {
    match page_token {
        Some(token) => {
            let sep = if path.contains('?') { '&' } else { '?' };
            format!("{}{}pageToken={}", path, sep, urlencoding::encode(token))
        },
        None => path.to_string(),
    }
}

/// Fetch every page and accumulate the array under `item_key`
///
/// `fetch_page` gets `None` for the first call and the previous response's
/// token afterwards. Pages without `item_key` contribute nothing.
pub async fn collect_pages<F, Fut>(item_key: &str, mut fetch_page: F) -> Result<Vec<Value>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Value>>,
{
    let mut all_items = Vec::new();
    let mut page_token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let mut response = fetch_page(page_token.take()).await?;
        pages += 1;

        let next_token = next_page_token(&response);
        if let Some(Value::Array(items)) = response.get_mut(item_key).map(Value::take) {
            all_items.extend(items);
        }

        match next_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    tracing::debug!(
        "Collected {} {} across {} page(s)",
        all_items.len(),
        item_key,
        pages
    );

    Ok(all_items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdminError;
    use serde_json::json;

    #[tokio::test]
    async fn test_collects_across_pages_in_order() {
        let pages = [
            json!({"projects": [{"projectId": "a"}, {"projectId": "b"}], "nextPageToken": "t1"}),
            json!({"nextPageToken": "t2"}),
            json!({"projects": [{"projectId": "c"}]}),
        ];
        let mut seen_tokens = Vec::new();

        let items = collect_pages("projects", |token| {
            let index = seen_tokens.len();
            seen_tokens.push(token);
            let page = pages[index].clone();
            async move { Ok::<_, AdminError>(page) }
        })
        .await
        .unwrap();

        let ids: Vec<&str> = items.iter().map(|p| p["projectId"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(
            seen_tokens,
            vec![None, Some("t1".to_string()), Some("t2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_empty_token_ends_iteration() {
        let items = collect_pages("billingAccounts", |_| async {
            Ok::<_, AdminError>(json!({"billingAccounts": [{"name": "billingAccounts/1"}], "nextPageToken": ""}))
        })
        .await
        .unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_page_error_propagates() {
        let result = collect_pages("projects", |_| async {
            Err::<Value, _>(AdminError::Api {
                status: 500,
                message: "backend".to_string(),
            })
        })
        .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_with_page_token() {
        assert_eq!(with_page_token("projects", None), "projects");
        assert_eq!(with_page_token("projects", Some("a b")), "projects?pageToken=a%20b");
        assert_eq!(
            with_page_token("b?project=p", Some("x")),
            "b?project=p&pageToken=x"
        );
    }
}
