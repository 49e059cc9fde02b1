use anyhow::{bail, Result};
use regex::Regex;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::models::Post;

/// Fetch up to `number` of the latest posts of `user` from a single Nitter instance.
pub async fn fetch_posts(
    client: &Client,
    instance: &str,
    user: &str,
    number: usize,
) -> Result<Vec<Post>> {
    let url = format!("{}/{}", instance.trim_end_matches('/'), user);
    debug!(%url, "requesting timeline");

    let response = client
        .get(&url)
        .header("User-Agent", "tweet-sentiment/0.1.0")
        .header("Accept", "text/html")
        .send()
        .await?;

    if !response.status().is_success() {
        debug!(%url, status = %response.status(), "instance returned no timeline");
        return Ok(Vec::new());
    }

    let html = response.text().await?;
    parse_timeline(&html, user, number)
}

/// Try each instance in order until one returns posts.
///
/// An instance that answers with an empty timeline is remembered, so a user with
/// no posts yields `Ok(vec![])`; only when every instance fails is an error returned.
pub async fn fetch_user(
    client: &Client,
    instances: &[String],
    user: &str,
    number: usize,
) -> Result<Vec<Post>> {
    let user = user.trim_start_matches('@');
    let mut answered = false;
    let mut last_error = None;

    for instance in instances {
        match fetch_posts(client, instance, user, number).await {
            Ok(posts) if !posts.is_empty() => {
                info!(%instance, user, posts = posts.len(), "fetched posts");
                return Ok(posts);
            }
            Ok(_) => {
                answered = true;
            }
            Err(e) => {
                warn!(%instance, user, error = %e, "instance failed, trying next");
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) if !answered => bail!("no Nitter instance reachable for @{}: {}", user, e),
        _ if instances.is_empty() => bail!("no Nitter instances configured"),
        _ => Ok(Vec::new()),
    }
}

/// Extract posts from a Nitter timeline page.
///
/// Each `timeline-item` contributes its `tweet-content` text; the status link
/// supplies the author and id when present.
fn parse_timeline(html: &str, user: &str, number: usize) -> Result<Vec<Post>> {
    let content_re = Regex::new(r#"(?s)<div class="tweet-content[^"]*"[^>]*>(.*?)</div>"#)?;
    let link_re = Regex::new(r#"class="tweet-link" href="/([^/"]+)/status/(\d+)"#)?;
    let tag_re = Regex::new(r"<[^>]+>")?;

    let mut posts = Vec::new();

    for item in html.split(r#"class="timeline-item"#).skip(1) {
        if posts.len() >= number {
            break;
        }
        let Some(content) = content_re.captures(item) else {
            continue;
        };
        let text = decode_entities(tag_re.replace_all(&content[1], "").trim());
        if text.is_empty() {
            continue;
        }

        let (author, id) = match link_re.captures(item) {
            Some(caps) => (caps[1].to_string(), Some(caps[2].to_string())),
            None => (user.to_string(), None),
        };

        posts.push(Post {
            text,
            author: Some(author),
            id,
        });
    }

    Ok(posts)
}

fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMELINE: &str = r##"
<div class="timeline">
  <div class="timeline-item " data-username="jack">
    <a class="tweet-link" href="/jack/status/20#m"></a>
    <div class="tweet-body">
      <a class="username" href="/jack" title="@jack">@jack</a>
      <div class="tweet-content media-body" dir="auto">just setting up my twttr</div>
    </div>
  </div>
  <div class="timeline-item ">
    <a class="tweet-link" href="/biz/status/21#m"></a>
    <div class="tweet-body">
      <div class="tweet-content media-body" dir="auto">Loving <a href="/search?q=%23rust">#rust</a> &amp; coffee &lt;3</div>
    </div>
  </div>
  <div class="timeline-item ">
    <div class="tweet-body">
      <div class="tweet-content media-body" dir="auto">   </div>
    </div>
  </div>
  <div class="timeline-item ">
    <div class="tweet-body">
      <div class="tweet-content media-body" dir="auto">no link here</div>
    </div>
  </div>
  <div class="show-more"><a href="?cursor=abc">Load more</a></div>
</div>
"##;

    #[test]
    fn test_parse_timeline() {
        let posts = parse_timeline(TIMELINE, "jack", 10).unwrap();
        assert_eq!(posts.len(), 3);

        assert_eq!(posts[0].text, "just setting up my twttr");
        assert_eq!(posts[0].author.as_deref(), Some("jack"));
        assert_eq!(posts[0].id.as_deref(), Some("20"));

        assert_eq!(posts[1].text, "Loving #rust & coffee <3");
        assert_eq!(posts[1].author.as_deref(), Some("biz"));

        assert_eq!(posts[2].text, "no link here");
        assert_eq!(posts[2].author.as_deref(), Some("jack"));
        assert_eq!(posts[2].id, None);
    }

    #[test]
    fn test_parse_timeline_respects_number() {
        let posts = parse_timeline(TIMELINE, "jack", 1).unwrap();
        assert_eq!(posts.len(), 1);
    }

    #[test]
    fn test_parse_empty_page() {
        let posts = parse_timeline("<html><body>User not found</body></html>", "x", 5).unwrap();
        assert!(posts.is_empty());
    }

    #[test]
    fn test_decode_entities_ampersand_last() {
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    /// Serve `status` with `body` to every connection on a loopback port.
    async fn serve(status: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });
        format!("http://{}", addr)
    }

    /// An address nothing listens on.
    async fn unreachable() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    fn client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    #[tokio::test]
    async fn test_fetch_user_falls_back_to_next_instance() {
        let instances = vec![unreachable().await, serve("200 OK", TIMELINE).await];
        let posts = fetch_user(&client(), &instances, "@jack", 10).await.unwrap();
        assert_eq!(posts.len(), 3);
        assert_eq!(posts[0].text, "just setting up my twttr");
    }

    #[tokio::test]
    async fn test_fetch_user_skips_empty_timeline() {
        let instances = vec![
            serve("200 OK", "<html><body>No items</body></html>").await,
            serve("200 OK", TIMELINE).await,
        ];
        let posts = fetch_user(&client(), &instances, "jack", 2).await.unwrap();
        assert_eq!(posts.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_user_all_instances_unreachable() {
        let instances = vec![unreachable().await, unreachable().await];
        let err = fetch_user(&client(), &instances, "jack", 5).await.unwrap_err();
        assert!(err.to_string().contains("no Nitter instance reachable for @jack"));
    }

    #[tokio::test]
    async fn test_fetch_user_answered_without_posts() {
        let instances = vec![unreachable().await, serve("404 Not Found", "").await];
        let posts = fetch_user(&client(), &instances, "jack", 5).await.unwrap();
        assert!(posts.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_user_without_instances() {
        let client = Client::new();
        let err = fetch_user(&client, &[], "jack", 5).await.unwrap_err();
        assert!(err.to_string().contains("no Nitter instances configured"));
    }
}
