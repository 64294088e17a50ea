// src/analyze/tokens.rs
// =============================================================================
// A flat token stream over an HTML document.
//
// scraper gives us a parsed tree, which is perfect for "find every <form>"
// questions. Headings and titles are easier to answer by walking tokens in
// order, so here we drive html5ever's tokenizer directly and collect a
// simplified token list.
//
// Simplifications compared to the raw html5ever stream:
// - adjacent character tokens are merged into one Text token
// - comments and doctypes are dropped
// - recoverable parse errors are logged and skipped
//
// The tokenizer alone does not know that <script> or <title> contents are
// raw text (that is normally the tree builder's job), so the sink tells it
// to switch states for those elements.
//
// Rust concepts:
// - Traits: html5ever calls our TokenSink for every token it produces
// - Pattern matching: One match arm per html5ever token kind
// =============================================================================

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};

/// One token of the simplified stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlToken {
    StartTag { name: String, self_closing: bool },
    EndTag { name: String },
    Text(String),
}

// Shorthand for building expected streams in tests
#[cfg(test)]
impl HtmlToken {
    pub fn start(name: &str) -> Self {
        HtmlToken::StartTag {
            name: name.to_string(),
            self_closing: false,
        }
    }

    pub fn end(name: &str) -> Self {
        HtmlToken::EndTag {
            name: name.to_string(),
        }
    }

    pub fn text(text: &str) -> Self {
        HtmlToken::Text(text.to_string())
    }
}

/// Elements that never have an end tag
pub fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "keygen"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Tokenizes a whole document into the simplified stream
pub fn tokenize(html: &str) -> Vec<HtmlToken> {
    let mut input = BufferQueue::new();
    input.push_back(StrTendril::from_slice(html));

    let mut tokenizer = Tokenizer::new(TokenCollector::default(), TokenizerOpts::default());
    let _ = tokenizer.feed(&mut input);
    tokenizer.end();

    let tokens = tokenizer.sink.tokens;
    ::log::trace!("tokenized {} bytes into {} tokens", html.len(), tokens.len());
    tokens
}

#[derive(Default)]
struct TokenCollector {
    tokens: Vec<HtmlToken>,
    // true while the last emitted html5ever token was character data
    in_text: bool,
}

impl TokenCollector {
    fn push_text(&mut self, text: &str) {
        if self.in_text {
            if let Some(HtmlToken::Text(current)) = self.tokens.last_mut() {
                current.push_str(text);
                return;
            }
        }
        self.tokens.push(HtmlToken::Text(text.to_string()));
        self.in_text = true;
    }

    fn push_tag(&mut self, tag: Tag) -> TokenSinkResult<()> {
        self.in_text = false;
        let name = tag.name.to_string();

        match tag.kind {
            TagKind::StartTag => {
                let next_state = if tag.self_closing {
                    TokenSinkResult::Continue
                } else {
                    raw_text_state(&name)
                };
                self.tokens.push(HtmlToken::StartTag {
                    name,
                    self_closing: tag.self_closing,
                });
                next_state
            }
            TagKind::EndTag => {
                self.tokens.push(HtmlToken::EndTag { name });
                TokenSinkResult::Continue
            }
        }
    }
}

// Same switches the HTML tree builder makes for these elements
fn raw_text_state(name: &str) -> TokenSinkResult<()> {
    match name {
        "title" | "textarea" => TokenSinkResult::RawData(RawKind::Rcdata),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => {
            TokenSinkResult::RawData(RawKind::Rawtext)
        }
        "script" => TokenSinkResult::RawData(RawKind::ScriptData),
        "plaintext" => TokenSinkResult::Plaintext,
        _ => TokenSinkResult::Continue,
    }
}

impl TokenSink for TokenCollector {
    type Handle = ();

    fn process_token(&mut self, token: Token, line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::CharacterTokens(text) => self.push_text(&text),
            Token::TagToken(tag) => return self.push_tag(tag),
            Token::CommentToken(_) | Token::DoctypeToken(_) => self.in_text = false,
            Token::ParseError(message) => {
                ::log::trace!("recoverable HTML parse error on line {}: {}", line_number, message);
            }
            Token::NullCharacterToken | Token::EOFToken => {}
        }
        TokenSinkResult::Continue
    }
}


// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is a tendril?
//    - html5ever's compact string type; StrTendril::from_slice copies our &str
//
// 2. Why return TokenSinkResult from process_token?
//    - It tells the tokenizer which state to continue in, which is how
//      we make <script> contents come back as text instead of tags
// -----------------------------------------------------------------------------
