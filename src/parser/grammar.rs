use tracing::debug;

use super::ast::*;
use super::cursor::Cursor;
use super::lexer::{Lexer, Located, Token};
use crate::error::ParseError;

/// Parse protobuf schema text into a `Definition`.
pub fn parse_definition(input: &str) -> Result<Definition, ParseError> {
    let tokens = Lexer::new(input).tokenize()?;
    let mut cursor = Cursor::new(tokens);
    let mut elements = Vec::new();

    loop {
        let tok = cursor.peek().clone();
        match &tok.token {
            Token::Eof => break,
            Token::Semicolon => {
                cursor.bump();
            }
            Token::Ident(kw) if kw == "syntax" => {
                elements.push(TopDecl::Syntax(parse_syntax(&mut cursor)?));
            }
            Token::Ident(kw) if kw == "package" => {
                elements.push(TopDecl::Package(parse_package(&mut cursor)?));
            }
            Token::Ident(kw) if kw == "message" => {
                elements.push(TopDecl::Message(parse_message(&mut cursor)?));
            }
            Token::Ident(kw) if kw == "service" => {
                elements.push(TopDecl::Service(parse_service(&mut cursor)?));
            }
            other => {
                let keyword = match other {
                    Token::Ident(kw) => kw.clone(),
                    other => other.to_string(),
                };
                debug!(keyword = %keyword, line = tok.line, "skipping unmodeled declaration");
                skip_statement(&mut cursor)?;
                elements.push(TopDecl::Unmodeled(Unmodeled {
                    keyword,
                    line: tok.line,
                }));
            }
        }
    }

    Ok(Definition { elements })
}

fn parse_syntax(c: &mut Cursor) -> Result<Syntax, ParseError> {
    let kw = c.bump();
    expect_token(c, Token::Equals)?;
    let value = expect_string(c)?;
    expect_token(c, Token::Semicolon)?;
    Ok(Syntax {
        value,
        line: kw.line,
    })
}

fn parse_package(c: &mut Cursor) -> Result<Package, ParseError> {
    let kw = c.bump();
    let name = expect_ident(c)?;
    expect_token(c, Token::Semicolon)?;
    Ok(Package {
        name,
        line: kw.line,
    })
}

fn parse_message(c: &mut Cursor) -> Result<Message, ParseError> {
    let kw = c.bump();
    let name = expect_ident(c)?;
    expect_token(c, Token::LBrace)?;
    skip_nested(c)?;
    debug!(message = %name, line = kw.line, "skipped message body");
    Ok(Message {
        name,
        line: kw.line,
    })
}

fn parse_service(c: &mut Cursor) -> Result<Service, ParseError> {
    let line = c.peek().line;
    let comment = Comment::from(c.leading_comment(line));
    c.bump();

    let name = expect_ident(c)?;
    expect_token(c, Token::LBrace)?;

    let mut options = Vec::new();
    let mut methods = Vec::new();

    loop {
        let tok = c.peek().clone();
        match &tok.token {
            Token::RBrace => {
                c.bump();
                break;
            }
            Token::Eof => return Err(syntax_error(&tok, "'}'")),
            Token::Semicolon => {
                c.bump();
            }
            Token::Ident(kw) if kw == "rpc" => methods.push(parse_rpc(c)?),
            Token::Ident(kw) if kw == "option" => options.push(parse_option(c)?),
            other => {
                debug!(service = %name, line = tok.line, found = %other, "skipping unmodeled service element");
                skip_statement(c)?;
            }
        }
    }

    Ok(Service {
        name,
        comment,
        options,
        methods,
        line,
    })
}

fn parse_rpc(c: &mut Cursor) -> Result<Method, ParseError> {
    let (line, column) = {
        let tok = c.peek();
        (tok.line, tok.column)
    };
    let comment = Comment::from(c.leading_comment(line));
    c.bump();

    let name = expect_ident(c)?;
    let (request_stream, request_type) = parse_rpc_type(c)?;
    expect_keyword(c, "returns")?;
    let (response_stream, response_type) = parse_rpc_type(c)?;

    let mut options = Vec::new();
    let tok = c.bump();
    match tok.token {
        Token::Semicolon => {}
        Token::LBrace => loop {
            let tok = c.peek().clone();
            match &tok.token {
                Token::RBrace => {
                    c.bump();
                    break;
                }
                Token::Eof => return Err(syntax_error(&tok, "'}'")),
                Token::Semicolon => {
                    c.bump();
                }
                Token::Ident(kw) if kw == "option" => options.push(parse_option(c)?),
                other => {
                    debug!(rpc = %name, line = tok.line, found = %other, "skipping unmodeled rpc element");
                    skip_statement(c)?;
                }
            }
        },
        _ => return Err(syntax_error(&tok, "';' or '{'")),
    }

    Ok(Method {
        name,
        request_type,
        request_stream,
        response_type,
        response_stream,
        comment,
        options,
        line,
        column,
    })
}

/// `( [stream] TypeName )`
fn parse_rpc_type(c: &mut Cursor) -> Result<(bool, String), ParseError> {
    expect_token(c, Token::LParen)?;
    let first = expect_ident(c)?;
    let streamed = first == "stream" && matches!(c.peek().token, Token::Ident(_));
    let type_name = if streamed { expect_ident(c)? } else { first };
    expect_token(c, Token::RParen)?;
    Ok((streamed, type_name))
}

fn parse_option(c: &mut Cursor) -> Result<OptionDecl, ParseError> {
    let kw = c.bump();
    let name = parse_option_name(c)?;
    expect_token(c, Token::Equals)?;

    let value = match block_close(&c.peek().token) {
        Some(close) => {
            c.bump();
            OptionValue::Aggregated(parse_aggregate_body(c, close)?)
        }
        None => OptionValue::Scalar(parse_literal(c)?),
    };
    expect_token(c, Token::Semicolon)?;

    Ok(OptionDecl {
        name,
        value,
        line: kw.line,
    })
}

/// `name`, `(ext.name)` or `(ext.name).field`, reconstructed as written.
fn parse_option_name(c: &mut Cursor) -> Result<String, ParseError> {
    let tok = c.bump();
    let mut name = match tok.token {
        Token::Ident(n) => n,
        Token::LParen => {
            let inner = expect_ident(c)?;
            expect_token(c, Token::RParen)?;
            format!("({inner})")
        }
        _ => return Err(syntax_error(&tok, "option name")),
    };
    while let Some(suffix) = peek_dotted_suffix(c) {
        name.push_str(&suffix);
        c.bump();
    }
    Ok(name)
}

fn peek_dotted_suffix(c: &mut Cursor) -> Option<String> {
    match &c.peek().token {
        Token::Ident(s) if s.starts_with('.') => Some(s.clone()),
        _ => None,
    }
}

/// Closing delimiter of a message literal opened by `tok`, which is either
/// `{ ... }` or the older `< ... >` form.
fn block_close(tok: &Token) -> Option<Token> {
    match tok {
        Token::LBrace => Some(Token::RBrace),
        Token::LAngle => Some(Token::RAngle),
        _ => None,
    }
}

/// Entries of an aggregated block whose opening delimiter is already
/// consumed, up to and including `close`.
fn parse_aggregate_body(
    c: &mut Cursor,
    close: Token,
) -> Result<Vec<(String, Literal)>, ParseError> {
    let mut entries = Vec::new();

    loop {
        let tok = c.bump();
        if tok.token == close {
            return Ok(entries);
        }
        let key = match tok.token {
            Token::Comma | Token::Semicolon => continue,
            Token::Ident(key) => key,
            Token::LBracket => {
                let ext = expect_ident(c)?;
                expect_token(c, Token::RBracket)?;
                format!("[{ext}]")
            }
            _ => return Err(syntax_error(&tok, &format!("field name or {close}"))),
        };

        let has_colon = c.peek().token == Token::Colon;
        if has_colon {
            c.bump();
        }

        let next = c.peek().clone();
        let value = match (block_close(&next.token), &next.token) {
            (Some(inner), _) => {
                c.bump();
                Literal::Block(parse_aggregate_body(c, inner)?)
            }
            (None, Token::LBracket) if has_colon => {
                c.bump();
                Literal::List(parse_list_body(c)?)
            }
            _ if has_colon => parse_literal(c)?,
            _ => return Err(syntax_error(&next, "':'")),
        };
        entries.push((key, value));
    }
}

/// Items of a list value whose `[` is already consumed.
fn parse_list_body(c: &mut Cursor) -> Result<Vec<Literal>, ParseError> {
    let mut items = Vec::new();

    loop {
        let next = c.peek().token.clone();
        if let Some(close) = block_close(&next) {
            c.bump();
            items.push(Literal::Block(parse_aggregate_body(c, close)?));
            continue;
        }
        match next {
            Token::RBracket => {
                c.bump();
                return Ok(items);
            }
            Token::Comma => {
                c.bump();
            }
            _ => items.push(parse_literal(c)?),
        }
    }
}

fn parse_literal(c: &mut Cursor) -> Result<Literal, ParseError> {
    let tok = c.bump();
    match tok.token {
        Token::Str(mut s) => {
            // Adjacent string literals concatenate.
            while let Some(next) = peek_string(c) {
                s.push_str(&next);
                c.bump();
            }
            Ok(Literal::String(s))
        }
        Token::Number(n) => Ok(Literal::Number(n)),
        Token::Ident(i) => Ok(Literal::Ident(i)),
        _ => Err(syntax_error(&tok, "literal value")),
    }
}

fn peek_string(c: &mut Cursor) -> Option<String> {
    match &c.peek().token {
        Token::Str(s) => Some(s.clone()),
        _ => None,
    }
}

// Skipping

/// Skip one unmodeled statement: up to a `;`, through a balanced `{ ... }`
/// block, or up to a closing delimiter that belongs to the enclosing block.
fn skip_statement(c: &mut Cursor) -> Result<(), ParseError> {
    let first = c.peek().clone();
    if matches!(first.token, Token::RBrace | Token::RParen | Token::RBracket) {
        return Err(syntax_error(&first, "declaration"));
    }

    loop {
        match c.peek().token {
            Token::Eof | Token::RBrace | Token::RParen | Token::RBracket => return Ok(()),
            Token::Semicolon => {
                c.bump();
                return Ok(());
            }
            Token::LBrace => {
                c.bump();
                return skip_nested(c);
            }
            Token::LParen | Token::LBracket => {
                c.bump();
                skip_nested(c)?;
            }
            _ => {
                c.bump();
            }
        }
    }
}

/// Skip past the delimiter closing an already-consumed opening delimiter.
fn skip_nested(c: &mut Cursor) -> Result<(), ParseError> {
    let mut depth = 1usize;
    loop {
        let tok = c.bump();
        match tok.token {
            Token::LBrace | Token::LParen | Token::LBracket => depth += 1,
            Token::RBrace | Token::RParen | Token::RBracket => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Token::Eof => return Err(syntax_error(&tok, "closing delimiter")),
            _ => {}
        }
    }
}

// Helper functions

fn syntax_error(tok: &Located, expected: &str) -> ParseError {
    ParseError::Syntax {
        line: tok.line,
        column: tok.column,
        expected: expected.to_string(),
        found: tok.token.to_string(),
    }
}

fn expect_ident(c: &mut Cursor) -> Result<String, ParseError> {
    let tok = c.bump();
    match tok.token {
        Token::Ident(n) => Ok(n),
        _ => Err(syntax_error(&tok, "identifier")),
    }
}

fn expect_keyword(c: &mut Cursor, keyword: &str) -> Result<(), ParseError> {
    let tok = c.bump();
    match &tok.token {
        Token::Ident(n) if n == keyword => Ok(()),
        _ => Err(syntax_error(&tok, &format!("'{keyword}'"))),
    }
}

fn expect_string(c: &mut Cursor) -> Result<String, ParseError> {
    let tok = c.bump();
    match tok.token {
        Token::Str(s) => Ok(s),
        _ => Err(syntax_error(&tok, "string literal")),
    }
}

fn expect_token(c: &mut Cursor, expected: Token) -> Result<(), ParseError> {
    let tok = c.bump();
    if tok.token == expected {
        Ok(())
    } else {
        Err(syntax_error(&tok, &expected.to_string()))
    }
}
