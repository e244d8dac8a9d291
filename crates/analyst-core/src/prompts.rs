//! Prompt builders for the Gemini calls
//!
//! The recommendation prompt pins the exact block format the
//! [`crate::recommend`] parser expects: `---` delimiters, `### ` titles with
//! a region flag and the ticker in parentheses, and four bolded field labels.

use crate::market::Market;
use serde::{Deserialize, Serialize};

/// Investor experience level used to pick the recommendation criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillLevel {
    Beginner,
    Expert,
}

/// Investment report prompt over a numbered news digest.
/// Foreign-market news arrives in English and is translated into the report.
pub fn news_report_prompt(news_digest: &str, market: Market) -> String {
    match market {
        Market::Foreign => format!(
            "다음은 미국 주식 관련 영문 뉴스 기사들입니다.\n\
             이를 한국어로 번역·종합하여 투자 리포트를 작성해줘.\n\
             [뉴스 데이터]\n{news_digest}\n\
             양식:\n\
             ## 1. 최신 뉴스 종합 3줄 요약 (한국어)\n\
             ## 2. 시장의 종합적 의견 (매수/매도/관망)\n\
             ## 3. 주요 리스크 및 호재 요인"
        ),
        Market::Domestic => format!(
            "다음 뉴스 기사들을 종합하여 투자 리포트를 작성해줘.\n\
             [뉴스 데이터]\n{news_digest}\n\
             양식:\n\
             ## 1. 최신 뉴스 종합 3줄 요약\n\
             ## 2. 시장의 종합적 의견 (매수/매도/관망)\n\
             ## 3. 주요 리스크 및 호재 요인"
        ),
    }
}

/// Six-stock recommendation prompt, three domestic and three US, in the
/// strict block format the card parser consumes.
pub fn recommendation_prompt(level: SkillLevel) -> String {
    let (audience, criteria, stars) = match level {
        SkillLevel::Beginner => (
            "주식 투자 초보자에게 적합한",
            "변동성 낮음, 배당 안정적, 글로벌 브랜드 인지도 높음, 장기 보유 적합.",
            "⭐",
        ),
        SkillLevel::Expert => (
            "주식 고수(경험 많은 투자자)가 주목할 만한",
            "성장 모멘텀 강함, 기관/외국인 매수세, AI·반도체·바이오 테마 유망.",
            "⭐⭐⭐⭐",
        ),
    };

    format!(
        "{audience} 국내·미국 주식 각 3종목씩 총 6종목을 추천해줘.\n\
         기준: {criteria}\n\n\
         반드시 아래 형식으로만 작성해줘. 다른 텍스트 없이 블록 6개만:\n\n\
         ---\n\
         ### 🇰🇷 [종목명] ([티커])\n\
         **한 줄 요약:** 한 문장 설명\n\
         **추천 이유:** 구체적 이유 한 문장\n\
         **리스크:** 주의사항 한 문장\n\
         **난이도:** {stars}\n\
         ---\n\n\
         국내 3개(🇰🇷) 먼저, 미국 3개(🇺🇸) 이어서. 티커는 괄호 안에 정확히 표기."
    )
}

/// Summary prompt for an uploaded stock-video audio track.
pub fn audio_brief_prompt() -> String {
    "이 주식 관련 영상의 핵심 내용을 투자자 입장에서 한국어로 요약해줘.\n\
     양식:\n\
     ## 1. 영상 핵심 3줄 요약\n\
     ## 2. 매매 의견 (매수/매도/관망) 및 목표가\n\
     ## 3. 주요 근거 및 포인트"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_report_variants() {
        let domestic = news_report_prompt("[1] 기사", Market::Domestic);
        assert!(domestic.contains("[뉴스 데이터]\n[1] 기사"));
        assert!(!domestic.contains("번역"));

        let foreign = news_report_prompt("[1] article", Market::Foreign);
        assert!(foreign.contains("번역"));
        assert!(foreign.contains("[1] article"));
    }

    #[test]
    fn test_recommendation_prompt_pins_parser_format() {
        for level in [SkillLevel::Beginner, SkillLevel::Expert] {
            let prompt = recommendation_prompt(level);
            // The parser depends on these exact markers
            assert!(prompt.contains("---"));
            assert!(prompt.contains("### 🇰🇷"));
            assert!(prompt.contains("**한 줄 요약:**"));
            assert!(prompt.contains("**추천 이유:**"));
            assert!(prompt.contains("**리스크:**"));
            assert!(prompt.contains("**난이도:**"));
        }
    }

    #[test]
    fn test_recommendation_prompt_difficulty_by_level() {
        assert!(recommendation_prompt(SkillLevel::Beginner).contains("**난이도:** ⭐\n"));
        assert!(recommendation_prompt(SkillLevel::Expert).contains("**난이도:** ⭐⭐⭐⭐\n"));
    }

    #[test]
    fn test_audio_brief_prompt_sections() {
        let prompt = audio_brief_prompt();
        assert!(prompt.contains("## 1."));
        assert!(prompt.contains("## 3."));
    }
}
