use chrono::Local;
use url::Url;

use crate::app::{AppContext, ContentError, Result};
use crate::domain::{parse_date, Link, LinkUpdate, Publisher, PublisherUpdate};
use crate::feed::fingerprint;
use crate::refresh::RefreshReport;
use crate::store::Store;

pub fn add_link(
    ctx: &AppContext,
    link: &str,
    title: Option<String>,
    kind: Option<String>,
    category: Option<String>,
) -> Result<()> {
    Url::parse(link)?;

    let mut record = Link::new(
        link.to_string(),
        title.unwrap_or_else(|| link.to_string()),
        Local::now().date_naive(),
    );
    record.kind = kind;
    record.category = category;

    ctx.store.add_link(&record)?;
    println!("Link inserted: {}", record.title);
    Ok(())
}

pub fn update_link(
    ctx: &AppContext,
    link: &str,
    date: Option<&str>,
    kind: Option<String>,
    category: Option<String>,
) -> Result<()> {
    let update = LinkUpdate {
        date: date.map(parse_date).transpose()?,
        kind,
        category,
    };
    ctx.store.update_link(link, &update)?;
    println!("Updated link: {}", link);
    Ok(())
}

pub fn remove_link(ctx: &AppContext, link: &str) -> Result<()> {
    ctx.store.delete_link(link)?;
    println!("Removed link: {}", link);
    Ok(())
}

pub fn list_links(ctx: &AppContext) -> Result<()> {
    let links = ctx.store.get_links()?;

    if links.is_empty() {
        println!("No links");
        return Ok(());
    }

    for link in links {
        let tags: Vec<&str> = [link.kind.as_deref(), link.category.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        println!("{} {}", link.date, link.title);
        if tags.is_empty() {
            println!("  {}", link.link);
        } else {
            println!("  {} [{}]", link.link, tags.join(", "));
        }
    }

    Ok(())
}

/// Add a publisher with the current fingerprint of its feed. An unreachable
/// feed is stored without a hash, so the first refresh treats it as new.
pub async fn add_publisher(
    ctx: &AppContext,
    name: &str,
    website: &str,
    rss: &str,
    kind: Option<String>,
    category: Option<String>,
) -> Result<i64> {
    Url::parse(website)?;
    Url::parse(rss)?;

    let mut publisher = Publisher::new(name.to_string(), website.to_string(), rss.to_string());
    publisher.kind = kind;
    publisher.category = category;

    match fingerprint(ctx.fetcher.as_ref(), &ctx.normalizer, rss).await {
        Ok(hash) => publisher.hash = Some(hash),
        Err(e @ ContentError::FeedUnavailable { .. }) => {
            eprintln!("Warning: {}; the feed will be read on the next refresh", e);
        }
        Err(e) => return Err(e),
    }

    let id = ctx.store.add_publisher(&publisher)?;
    println!("Added publisher: {}", name);
    Ok(id)
}

/// Update a publisher. A new feed URL resets the fingerprint so the next
/// refresh reads the new feed in full.
pub fn update_publisher(
    ctx: &AppContext,
    name: &str,
    rss: Option<String>,
    kind: Option<String>,
    category: Option<String>,
) -> Result<()> {
    if let Some(ref rss) = rss {
        Url::parse(rss)?;
    }
    let update = PublisherUpdate {
        rss,
        kind,
        category,
    };
    ctx.store.update_publisher(name, &update)?;
    println!("Updated publisher: {}", name);
    Ok(())
}

pub fn remove_publisher(ctx: &AppContext, name: &str) -> Result<()> {
    ctx.store.delete_publisher(name)?;
    println!("Removed publisher: {}", name);
    Ok(())
}

pub fn list_publishers(ctx: &AppContext) -> Result<()> {
    let publishers = ctx.store.list_publishers()?;

    if publishers.is_empty() {
        println!("No publishers");
        return Ok(());
    }

    for publisher in publishers {
        let status = if publisher.hash.is_some() {
            "tracked"
        } else {
            "never refreshed"
        };
        println!("{} ({})\n  {}", publisher.name, status, publisher.rss);
    }

    Ok(())
}

pub fn list_entries(ctx: &AppContext, publisher: Option<&str>, json: bool) -> Result<()> {
    let entries = match publisher {
        Some(name) => {
            let publisher = ctx
                .store
                .get_publisher_by_name(name)?
                .ok_or_else(|| ContentError::NotFound(format!("publisher {name:?}")))?;
            ctx.store.get_entries_by_publisher(publisher.id)?
        }
        None => ctx.store.get_entries()?,
    };

    if json {
        let out = serde_json::to_string_pretty(&entries)
            .map_err(|e| ContentError::Other(e.to_string()))?;
        println!("{}", out);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No entries");
        return Ok(());
    }

    for entry in entries {
        let date = entry
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "          ".to_string());
        println!("{} {}\n  {}", date, entry.title, entry.link);
    }

    Ok(())
}

pub async fn refresh(ctx: &AppContext, verbose: bool) -> Result<RefreshReport> {
    let report = ctx.refresher().refresh_all().await?;
    println!("{}", report.render(verbose));
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{Days, TimeZone, Utc};

    use crate::config::Config;
    use crate::fetcher::memory::{rss_fixture, MemoryFetcher};

    const FEED: &str = "https://blog.example.com/rss";

    fn context(fetcher: Arc<MemoryFetcher>) -> AppContext {
        let mut ctx = AppContext::in_memory(Config::default()).unwrap();
        ctx.fetcher = fetcher;
        ctx
    }

    fn recent_feed() -> String {
        let yesterday = Local::now().date_naive() - Days::new(1);
        rss_fixture(&[(
            "Fresh",
            "https://blog.example.com/fresh",
            Utc.from_utc_datetime(&yesterday.and_hms_opt(12, 0, 0).unwrap()),
        )])
    }

    #[tokio::test]
    async fn test_add_publisher_records_fingerprint() {
        let fetcher = Arc::new(MemoryFetcher::new());
        fetcher.serve(FEED, recent_feed());
        let ctx = context(fetcher.clone());

        let id = add_publisher(&ctx, "Blog", "https://blog.example.com", FEED, None, None)
            .await
            .unwrap();

        let expected = fingerprint(fetcher.as_ref(), &ctx.normalizer, FEED)
            .await
            .unwrap();
        let stored = ctx.store.get_publisher(id).unwrap().unwrap();
        assert_eq!(stored.hash, Some(expected));
    }

    #[tokio::test]
    async fn test_add_publisher_with_unreachable_feed_has_no_hash() {
        let ctx = context(Arc::new(MemoryFetcher::new()));

        let id = add_publisher(&ctx, "Blog", "https://blog.example.com", FEED, None, None)
            .await
            .unwrap();

        assert_eq!(ctx.store.get_publisher(id).unwrap().unwrap().hash, None);
    }

    #[tokio::test]
    async fn test_add_publisher_rejects_bad_url() {
        let ctx = context(Arc::new(MemoryFetcher::new()));
        let err = add_publisher(&ctx, "Blog", "not a url", FEED, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::InvalidUrl(_)));
        assert!(ctx.store.list_publishers().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_after_unreachable_add_picks_up_entries() {
        let fetcher = Arc::new(MemoryFetcher::new());
        let ctx = context(fetcher.clone());
        let id = add_publisher(&ctx, "Blog", "https://blog.example.com", FEED, None, None)
            .await
            .unwrap();

        fetcher.serve(FEED, recent_feed());
        let report = refresh(&ctx, true).await.unwrap();

        assert_eq!(report.total_added(), 1);
        assert_eq!(ctx.store.get_entries_by_publisher(id).unwrap().len(), 1);
    }

    #[test]
    fn test_add_link_defaults_title_to_url() {
        let ctx = context(Arc::new(MemoryFetcher::new()));
        add_link(
            &ctx,
            "https://example.com/read-me",
            None,
            Some("article".into()),
            None,
        )
        .unwrap();

        let links = ctx.store.get_links().unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].title, "https://example.com/read-me");
        assert_eq!(links[0].kind, Some("article".into()));
        assert_eq!(links[0].date, Local::now().date_naive());
    }

    #[test]
    fn test_update_link_parses_date() {
        let ctx = context(Arc::new(MemoryFetcher::new()));
        add_link(&ctx, "https://example.com/a", Some("A".into()), None, None).unwrap();

        update_link(&ctx, "https://example.com/a", Some("2024-02-29"), None, Some("math".into())).unwrap();
        let link = ctx.store.get_link_by_title("A").unwrap().unwrap();
        assert_eq!(link.date.to_string(), "2024-02-29");
        assert_eq!(link.category, Some("math".into()));

        assert!(matches!(
            update_link(&ctx, "https://example.com/a", Some("yesterday"), None, None),
            Err(ContentError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_new_feed_url_resets_fingerprint() {
        let fetcher = Arc::new(MemoryFetcher::new());
        fetcher.serve(FEED, recent_feed());
        let ctx = context(fetcher);
        let id = tokio_test::block_on(add_publisher(
            &ctx,
            "Blog",
            "https://blog.example.com",
            FEED,
            None,
            None,
        ))
        .unwrap();
        assert!(ctx.store.get_publisher(id).unwrap().unwrap().hash.is_some());

        update_publisher(
            &ctx,
            "Blog",
            Some("https://blog.example.com/atom".into()),
            None,
            None,
        )
        .unwrap();

        let publisher = ctx.store.get_publisher(id).unwrap().unwrap();
        assert_eq!(publisher.rss, "https://blog.example.com/atom");
        assert_eq!(publisher.hash, None);
    }

    #[test]
    fn test_list_entries_for_unknown_publisher() {
        let ctx = context(Arc::new(MemoryFetcher::new()));
        assert!(matches!(
            list_entries(&ctx, Some("nobody"), false),
            Err(ContentError::NotFound(_))
        ));
    }
}
