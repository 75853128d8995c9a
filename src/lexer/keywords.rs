/*
 * ==========================================================================
 * RYE - A small functional scripting language
 * ==========================================================================
 *
 * License:
 * This file is part of the Rye programming language project.
 *
 * Rye is dual-licensed under the terms of:
 *   - The MIT license
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

use crate::lexer::token::TokenKind;

/// Maps a scanned word onto its keyword kind, if it is one. Aliases collapse
/// onto the same kind: `then` and `bind` are the pipe operator, `each` is
/// `map`.
pub fn keyword_kind(word: &str) -> Option<TokenKind> {
    match word {
        "and" => Some(TokenKind::And),
        "break" => Some(TokenKind::Break),
        "continue" => Some(TokenKind::Continue),
        "else" => Some(TokenKind::Else),
        "false" => Some(TokenKind::False),
        "for" => Some(TokenKind::For),
        "if" => Some(TokenKind::If),
        "null" => Some(TokenKind::Null),
        "or" => Some(TokenKind::Or),
        "return" => Some(TokenKind::Return),
        "true" => Some(TokenKind::True),
        "while" => Some(TokenKind::While),
        "until" => Some(TokenKind::Until),
        "unless" => Some(TokenKind::Unless),
        "fail" => Some(TokenKind::Fail),
        "success" => Some(TokenKind::Success),
        "map" => Some(TokenKind::Map),
        "where" => Some(TokenKind::Where),
        "in" => Some(TokenKind::In),
        "var" => Some(TokenKind::Var),
        "_" => Some(TokenKind::Underscore),
        "index" => Some(TokenKind::Index),
        "import" => Some(TokenKind::Import),
        "as" => Some(TokenKind::As),
        "then" => Some(TokenKind::Pipe),
        "bind" => Some(TokenKind::Pipe),
        "find" => Some(TokenKind::Find),
        "fold" => Some(TokenKind::Fold),
        "each" => Some(TokenKind::Map),
        _ => None,
    }
}
