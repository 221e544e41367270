//! Library API integration tests
use depeche_core::*;
use pretty_assertions::assert_eq;

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(get_fixture_path(name)).unwrap()
}

fn kinds(blocks: &[ContentBlock]) -> Vec<BlockKind> {
    blocks.iter().map(ContentBlock::kind).collect()
}

#[test]
fn test_classify_fixtures() {
    assert_eq!(classify(&Document::parse(&read_fixture("standard.html"))), Layout::Standard);
    assert_eq!(classify(&Document::parse(&read_fixture("longform.html"))), Layout::LongForm);
    assert_eq!(classify(&Document::parse(&read_fixture("live.html"))), Layout::Live);
}

#[test]
fn test_standard_article() {
    let page = extract_page(&read_fixture("standard.html")).unwrap();
    let blocks = &page.blocks;

    assert_eq!(page.layout, Layout::Standard);
    assert_eq!(
        kinds(blocks),
        vec![
            BlockKind::Text,
            BlockKind::Text,
            BlockKind::Text,
            BlockKind::Text,
            BlockKind::Text,
            BlockKind::Text,
            BlockKind::Subtitle,
            BlockKind::Image,
            BlockKind::Text,
            BlockKind::Text,
        ]
    );
    assert_eq!(blocks[0].as_text(), Some("Le budget 2020 adopté en première lecture"));
    assert_eq!(blocks[2].as_text(), Some("Par Jeanne Martin"));
    assert_eq!(
        blocks[3].as_text(),
        Some("Publié le 03 mars 2020 à 10h15 - Mis à jour le 03 mars 2020 à 12h40")
    );
    assert_eq!(blocks[4].as_text(), Some("Temps de lecture 4 min."));
    assert_eq!(
        blocks[5].as_text(),
        Some("Le texte a été adopté par l'Assemblée nationale par 350 voix contre 190.")
    );
    assert_eq!(blocks[7], ContentBlock::image("https://img.example.com/vote.jpg"));
    assert_eq!(page.comments_uri.as_deref(), Some("https://www.lemonde.fr/reactions/budget-2020.html"));
}

#[test]
fn test_paragraph_markup_has_no_anchors() {
    let page = extract_page(&read_fixture("standard.html")).unwrap();
    let ContentBlock::Text(paragraph) = &page.blocks[5] else { panic!("expected text block") };

    let markup = paragraph.markup.as_deref().unwrap();
    assert!(!markup.contains("<a"));
    assert!(markup.contains("l'Assemblée nationale"));
}

#[test]
fn test_citation_is_italic() {
    let page = extract_page(&read_fixture("standard.html")).unwrap();
    let ContentBlock::Text(cite) = &page.blocks[8] else { panic!("expected text block") };

    assert!(cite.style.italic);
    assert!(cite.text.contains("Nous tenons nos engagements"));
}

#[test]
fn test_tweet_gate() {
    let html = read_fixture("standard.html");

    let hidden = Pipeline::new(Config::default()).extract_page(&html).unwrap();
    assert!(!kinds(&hidden.blocks).contains(&BlockKind::Tweet));

    let config = Config::builder().display_tweets(true).build();
    let shown = Pipeline::new(config).extract_page(&html).unwrap();
    let tweets: Vec<_> = shown.blocks.iter().filter(|b| b.kind() == BlockKind::Tweet).collect();
    assert_eq!(tweets.len(), 1);
    assert_eq!(shown.blocks.len(), hidden.blocks.len() + 1);
}

#[test]
fn test_extraction_is_idempotent() {
    let html = read_fixture("standard.html");
    let pipeline = Pipeline::default();

    assert_eq!(pipeline.extract_page(&html).unwrap(), pipeline.extract_page(&html).unwrap());
}

#[test]
fn test_long_form_article() {
    let page = extract_page(&read_fixture("longform.html")).unwrap();

    assert_eq!(page.layout, Layout::LongForm);
    assert_eq!(page.blocks.len(), 8);
    assert_eq!(page.blocks[0].as_text(), Some("Sur la route du sel"));
    assert_eq!(page.blocks[2].as_text(), Some("Par Paul Durand"));
    assert_eq!(page.blocks[3].as_text(), Some("Publié le 12 juillet 2019"));
    assert_eq!(page.blocks[6].kind(), BlockKind::Subtitle);
    assert_eq!(page.blocks[7].as_text(), Some("Le sel est ramassé à la main."));
}

#[test]
fn test_dark_theme_read_time_icon() {
    let config = Config::builder().theme(Theme::Dark).build();
    let page = Pipeline::new(config).extract_page(&read_fixture("standard.html")).unwrap();
    let ContentBlock::Text(read_time) = &page.blocks[4] else { panic!("expected text block") };

    assert_eq!(read_time.icon, Some(Icon::ClockLight));
}

#[test]
fn test_live_page() {
    let page = extract_page(&read_fixture("live.html")).unwrap();

    assert_eq!(page.layout, Layout::Live);
    assert_eq!(page.live_event_id.as_deref(), Some("2854032"));
    assert_eq!(
        kinds(&page.blocks),
        vec![BlockKind::Text, BlockKind::Text, BlockKind::Text, BlockKind::Fact, BlockKind::Fact, BlockKind::Live]
    );
    assert_eq!(page.blocks[2].as_text(), Some("Les faits essentiels"));

    let ContentBlock::Live(post) = &page.blocks[5] else { panic!("expected live block") };
    assert_eq!(post.author, "Marie Lefèvre");
    assert_eq!(post.avatar_url.as_deref(), Some("https://img.example.com/avatars/marie.png"));
    assert_eq!(
        post.sub_blocks,
        vec![
            SubBlock::paragraph("Le ministre de la santé tiendra une conférence de presse à midi."),
            SubBlock::image("https://img.example.com/conference.jpg"),
        ]
    );
}

#[test]
fn test_english_labels() {
    let config = Config::builder().labels(Labels::english()).build();
    let page = Pipeline::new(config).extract_page(&read_fixture("live.html")).unwrap();

    assert_eq!(page.blocks[2].as_text(), Some(Labels::english().facts.as_str()));
}

#[test]
fn test_expand_saved_feed() {
    let blocks = expand_feed_json(&read_fixture("posts.json"), &Config::default()).unwrap();

    assert_eq!(blocks.len(), 9);
    assert_eq!(blocks[0].as_text(), Some("03/03/2020 10:15"));

    let ContentBlock::Text(tag) = &blocks[1] else { panic!("expected tag block") };
    assert_eq!(tag.text, "Alerte");
    assert_eq!(tag.colors.as_ref().map(|c| c.background), Some(Color::from_hex("#E12D2D").unwrap()));

    assert_eq!(blocks[2].as_text(), Some("Bonjour,"));
    assert_eq!(blocks[3].as_text(), Some("La situation est sous contrôle"));
    assert_eq!(blocks[4].as_text(), Some("03/03/2020 10:30"));
    assert_eq!(blocks[5].as_text(), Some("Premier paragraphe lien."));
    assert_eq!(blocks[6], ContentBlock::image("https://img.example.com/post.jpg"));
    assert_eq!(blocks[7].as_text(), Some("Texte libre"));
    assert_eq!(blocks[8].as_text(), Some("Message sans date valide"));
}

#[test]
fn test_feed_dates_follow_offset() {
    let config = Config::builder().utc_offset_hours(1).build();
    let blocks = expand_feed_json(&read_fixture("posts.json"), &config).unwrap();

    assert_eq!(blocks[0].as_text(), Some("03/03/2020 11:15"));
}

#[test]
fn test_malformed_feed() {
    let err = expand_feed_json("{\"Posts\": [", &Config::default()).unwrap_err();
    assert_eq!(err.category(), FailureCategory::Decode);
}

#[test]
fn test_parse_comments_fixture() {
    let blocks = parse_comments(&read_fixture("comments.html")).unwrap();

    assert_eq!(
        blocks,
        vec![
            ContentBlock::Comment(CommentBlock { part: CommentPart::Author, text: "Jean D.".into(), reply: false }),
            ContentBlock::Comment(CommentBlock {
                part: CommentPart::Content,
                text: "Très bon article, merci.".into(),
                reply: false
            }),
            ContentBlock::Comment(CommentBlock { part: CommentPart::Author, text: "Claire".into(), reply: true }),
            ContentBlock::Comment(CommentBlock {
                part: CommentPart::Content,
                text: "Je ne suis pas d'accord.".into(),
                reply: true
            }),
        ]
    );
}

#[test]
fn test_render_formats() {
    let page = extract_page(&read_fixture("standard.html")).unwrap();

    let json: serde_json::Value = serde_json::from_str(&to_json(&page.blocks, false).unwrap()).unwrap();
    assert_eq!(json.as_array().map(Vec::len), Some(page.blocks.len()));
    assert_eq!(json[6]["kind"], "subtitle");

    let text = to_text(&page.blocks);
    assert!(text.starts_with("Le budget 2020 adopté en première lecture"));
    assert!(text.contains("## Un vote sans surprise"));
    assert!(text.contains("[image] https://img.example.com/vote.jpg"));
}

#[test]
fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "display_tweets = true\ntheme = \"dark\"\n\n[live_api]\npage_size = 50\n").unwrap();

    let config = Config::load(&path).unwrap();
    assert!(config.display_tweets);
    assert_eq!(config.theme, Theme::Dark);
    assert_eq!(config.live_api.page_size, 50);
    assert_eq!(config.live_api.token, config::DEFAULT_LIVE_API_TOKEN);
}
