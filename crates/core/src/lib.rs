pub mod block;
pub mod classify;
pub mod comments;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod live;
pub mod parse;
pub mod pipeline;
pub mod posts;
pub mod render;
pub mod text;

pub use block::{
    BlockKind, Color, CommentBlock, CommentPart, ContentBlock, FactBlock, Icon, ImageBlock, LiveBlock, Padding,
    SubBlock, TagColors, TextBlock, TextSize, TextStyle, TweetBlock,
};
pub use classify::{Layout, classify, try_classify};
pub use comments::{comments_uri, fetch_comments, parse_comments};
pub use config::{Config, ConfigBuilder, Labels, LiveApiConfig, Theme};
pub use error::{DepecheError, FailureCategory, Result};
pub use extract::{LONG_FORM_SELECTORS, LayoutSelectors, STANDARD_SELECTORS, body_blocks, extract_article, header_blocks};
#[cfg(feature = "fetch")]
pub use fetch::{HttpFetcher, fetch_url};
pub use fetch::{FetchConfig, Fetcher, fetch_file, fetch_stdin};
pub use live::{LiveFeedRequest, event_id_from_script, extract_live, fact_blocks, find_live_event_id, inline_posts};
pub use parse::{Document, Element, FragmentNode};
#[cfg(feature = "fetch")]
pub use pipeline::extract_page_with_enrichment;
pub use pipeline::{PageExtraction, Pipeline, extract_page};
pub use posts::{LiveFeed, LivePost, PostIcon, PostId, decode_posts, expand_feed_json, expand_post, expand_posts, format_feed_date};
pub use render::{JsonConfig, TextConfig, convert_to_json, convert_to_text, to_json, to_text};
pub use text::{html_to_text, unwrap_anchors};
