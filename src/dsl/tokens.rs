//! Token kind names used by the grammar-description DSL's own tokenizer
//! (spec §4.6). Plain `&str` constants rather than an enum, since every
//! token kind in this engine is an interned `TokenKind` string (spec §4.3)
//! rather than a closed Rust enum the way the teacher's `TokenImpl` is.
pub const WS: &str = "Ws";
pub const ASSIGN: &str = "Assign";
pub const SEMICOLON: &str = "Semicolon";
pub const BAR: &str = "Bar";
pub const L_PAREN: &str = "LParen";
pub const R_PAREN: &str = "RParen";
pub const L_BRACE: &str = "LBrace";
pub const R_BRACE: &str = "RBrace";
pub const L_BRACKET: &str = "LBracket";
pub const R_BRACKET: &str = "RBracket";
pub const COLON: &str = "Colon";
pub const COMMA: &str = "Comma";
pub const PERCENT: &str = "Percent";
pub const QUESTION: &str = "Question";
pub const STAR: &str = "Star";
pub const PLUS: &str = "Plus";
pub const EMPTY_LIT: &str = "EmptyLit";
pub const STRING_LIT: &str = "StringLit";
pub const REGEX_LIT: &str = "RegexLit";
pub const READ_KW: &str = "ReadKw";
pub const IDENT: &str = "Ident";
pub const DIGITS: &str = "Digits";
