use slate_lang::literal::Literal;
use slate_lang::token::{Token, Type};

#[test]
fn create_token() {
    let token = Token::new(Type::LeftParen, "(".to_string(), None, 3);

    assert_eq!(token.r#type, Type::LeftParen);
    assert_eq!(token.lexeme, "(");
    assert_eq!(token.literal, None);
    assert_eq!(token.line, 3);
}

#[test]
fn create_token_from_str() {
    let token = Token::from("init");

    assert_eq!(token.r#type, Type::Identifier);
    assert_eq!(token.lexeme, "init");
    assert_eq!(token.literal, None);
    assert_eq!(token.line, 1);
}

#[test]
fn display_token_without_literal() {
    let token = Token::new(Type::LeftParen, "(".to_string(), None, 1);

    assert_eq!(format!("{token}"), "LEFT_PAREN ( null");
}

#[test]
fn display_token_with_number_literal() {
    let token = Token::new(
        Type::Number,
        "2.5".to_string(),
        Some(Literal::Number(2.5)),
        1,
    );

    assert_eq!(format!("{token}"), "NUMBER 2.5 2.5");
}

#[test]
fn display_token_with_integral_number_literal() {
    let token = Token::new(
        Type::Number,
        "42".to_string(),
        Some(Literal::Number(42.0)),
        1,
    );

    assert_eq!(format!("{token}"), "NUMBER 42 42");
}

#[test]
fn display_token_with_string_literal() {
    let token = Token::new(
        Type::String,
        "\"hi\"".to_string(),
        Some(Literal::String("hi".to_string())),
        1,
    );

    assert_eq!(format!("{token}"), "STRING \"hi\" hi");
}

#[test]
fn display_eof() {
    let token = Token::new(Type::EOF, String::new(), None, 7);

    assert_eq!(format!("{token}"), "EOF  null");
}
