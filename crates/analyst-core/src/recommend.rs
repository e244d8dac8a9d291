//! Parser for AI-generated stock recommendation text
//!
//! The model is prompted to emit `---`-delimited blocks, each titled with a
//! `### ` heading carrying a region flag and a ticker in parentheses,
//! followed by four bolded field labels. The model does not always comply;
//! anything that fails to parse degrades to raw-text display.

use crate::market::Market;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Ticker-like token inside the first matching parentheses of a title
static TICKER_IN_PARENS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([A-Z0-9.\-]{1,10})\)").expect("hardcoded regex"));

/// Any parenthesized segment, stripped from the display name
static PARENS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]+\)").expect("hardcoded regex"));

const BLOCK_DELIMITER: &str = "---";
const TITLE_MARKER: &str = "### ";
const DOMESTIC_FLAG: &str = "🇰🇷";
const FOREIGN_FLAG: &str = "🇺🇸";

const LABEL_SUMMARY: &str = "**한 줄 요약:**";
const LABEL_RATIONALE: &str = "**추천 이유:**";
const LABEL_RISK: &str = "**리스크:**";
const LABEL_STARS: &str = "**난이도:**";

const DEFAULT_STARS: &str = "⭐";

/// Display groups are capped at three cards per region
pub const MAX_CARDS_PER_REGION: usize = 3;

/// One parsed recommendation card. Display-only, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockCard {
    pub region: Market,
    pub name: String,
    pub ticker: String,
    pub summary: String,
    pub rationale: String,
    pub risk: String,
    /// Difficulty rating as emitted by the model, e.g. "⭐⭐⭐"
    pub stars: String,
}

/// Parse result: structured cards, or the raw text when nothing parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recommendation {
    Cards(Vec<StockCard>),
    Raw(String),
}

/// Cards partitioned by region for display, source order preserved,
/// truncated to [`MAX_CARDS_PER_REGION`] each
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedCards {
    pub domestic: Vec<StockCard>,
    pub foreign: Vec<StockCard>,
}

/// Parse an AI response into cards, falling back to raw text when no block
/// yields a title.
pub fn parse_recommendation(text: &str) -> Recommendation {
    let cards = parse_cards(text);
    if cards.is_empty() {
        Recommendation::Raw(text.to_string())
    } else {
        Recommendation::Cards(cards)
    }
}

/// Parse every `---`-delimited block into a card, in source order.
/// Blocks without a parseable title line are dropped.
pub fn parse_cards(text: &str) -> Vec<StockCard> {
    text.split(BLOCK_DELIMITER)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .filter_map(parse_block)
        .collect()
}

fn parse_block(block: &str) -> Option<StockCard> {
    let mut region = Market::Foreign;
    let mut name = String::new();
    let mut ticker = String::new();
    let mut summary = String::new();
    let mut rationale = String::new();
    let mut risk = String::new();
    let mut stars = DEFAULT_STARS.to_string();

    for line in block.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(title) = line.strip_prefix(TITLE_MARKER) {
            if title.contains(DOMESTIC_FLAG) {
                region = Market::Domestic;
            } else if title.contains(FOREIGN_FLAG) {
                region = Market::Foreign;
            }
            name = PARENS_RE
                .replace_all(title, "")
                .replace(DOMESTIC_FLAG, "")
                .replace(FOREIGN_FLAG, "")
                .trim()
                .to_string();
            ticker = extract_ticker(title).unwrap_or_default();
        } else if let Some(rest) = line.strip_prefix(LABEL_SUMMARY) {
            summary = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix(LABEL_RATIONALE) {
            rationale = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix(LABEL_RISK) {
            risk = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix(LABEL_STARS) {
            let rest = rest.trim();
            if !rest.is_empty() {
                stars = rest.to_string();
            }
        }
    }

    // A parsed title alone is enough to keep the card
    if name.is_empty() {
        return None;
    }

    Some(StockCard {
        region,
        name,
        ticker,
        summary,
        rationale,
        risk,
        stars,
    })
}

/// Extract a ticker-like token from the first matching parentheses.
pub fn extract_ticker(text: &str) -> Option<String> {
    TICKER_IN_PARENS_RE
        .captures(text)
        .map(|c| c[1].to_string())
}

/// Partition cards by region for display. Relative order within each region
/// is preserved; each group is truncated to [`MAX_CARDS_PER_REGION`].
pub fn group_cards(cards: Vec<StockCard>) -> GroupedCards {
    let mut grouped = GroupedCards::default();
    for card in cards {
        let group = match card.region {
            Market::Domestic => &mut grouped.domestic,
            Market::Foreign => &mut grouped.foreign,
        };
        if group.len() < MAX_CARDS_PER_REGION {
            group.push(card);
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_block_round_trip() {
        let text = "### 🇰🇷 ABC (000001)\n**한 줄 요약:** x\n---\n### 🇺🇸 XYZ (XYZ1)\n**리스크:** y\n---";
        let cards = parse_cards(text);
        assert_eq!(cards.len(), 2);

        assert_eq!(cards[0].region, Market::Domestic);
        assert_eq!(cards[0].name, "ABC");
        assert_eq!(cards[0].ticker, "000001");
        assert_eq!(cards[0].summary, "x");
        assert_eq!(cards[0].stars, "⭐");

        assert_eq!(cards[1].region, Market::Foreign);
        assert_eq!(cards[1].name, "XYZ");
        assert_eq!(cards[1].ticker, "XYZ1");
        assert_eq!(cards[1].risk, "y");
        assert_eq!(cards[1].stars, "⭐");
    }

    #[test]
    fn test_full_block() {
        let text = "---\n### 🇰🇷 삼성전자 (005930.KS)\n\
                    **한 줄 요약:** 국내 대표 반도체주\n\
                    **추천 이유:** 메모리 업황 회복\n\
                    **리스크:** 업황 변동성\n\
                    **난이도:** ⭐⭐⭐\n---";
        let cards = parse_cards(text);
        assert_eq!(cards.len(), 1);
        let card = &cards[0];
        assert_eq!(card.name, "삼성전자");
        assert_eq!(card.ticker, "005930.KS");
        assert_eq!(card.summary, "국내 대표 반도체주");
        assert_eq!(card.rationale, "메모리 업황 회복");
        assert_eq!(card.risk, "업황 변동성");
        assert_eq!(card.stars, "⭐⭐⭐");
    }

    #[test]
    fn test_no_title_yields_empty() {
        let text = "그냥 자유 서술형 답변입니다.\n목록도 헤딩도 없습니다.";
        assert!(parse_cards(text).is_empty());
        assert_eq!(
            parse_recommendation(text),
            Recommendation::Raw(text.to_string())
        );
    }

    #[test]
    fn test_region_defaults_to_foreign() {
        let cards = parse_cards("### NVIDIA (NVDA)\n**한 줄 요약:** AI 반도체");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].region, Market::Foreign);
    }

    #[test]
    fn test_block_without_name_is_dropped() {
        let text = "**한 줄 요약:** 제목 없는 블록\n---\n### 🇺🇸 Tesla (TSLA)";
        let cards = parse_cards(text);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].name, "Tesla");
    }

    #[test]
    fn test_extract_ticker() {
        assert_eq!(extract_ticker("삼성전자 (005930.KS)"), Some("005930.KS".to_string()));
        assert_eq!(extract_ticker("Tesla (TSLA)"), Some("TSLA".to_string()));
        assert_eq!(extract_ticker("no parens here"), None);
        // Lowercase content is not a ticker token
        assert_eq!(extract_ticker("Apple (maybe)"), None);
    }

    fn card(region: Market, name: &str) -> StockCard {
        StockCard {
            region,
            name: name.to_string(),
            ticker: String::new(),
            summary: String::new(),
            rationale: String::new(),
            risk: String::new(),
            stars: DEFAULT_STARS.to_string(),
        }
    }

    #[test]
    fn test_grouping_truncates_to_three_in_order() {
        let cards = vec![
            card(Market::Domestic, "a"),
            card(Market::Domestic, "b"),
            card(Market::Domestic, "c"),
            card(Market::Domestic, "d"),
            card(Market::Domestic, "e"),
            card(Market::Foreign, "z"),
        ];
        let grouped = group_cards(cards);
        let names: Vec<_> = grouped.domestic.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(grouped.foreign.len(), 1);
        assert_eq!(grouped.foreign[0].name, "z");
    }
}
