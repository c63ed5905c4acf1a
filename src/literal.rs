use miette::Result;

use crate::error;
use crate::token::{LiteralKind, Token, TokenKind};

/// Evaluate a numeric literal token into an operand byte.
///
/// Values above 255 are rejected in every base. Digits are accumulated with checked
/// arithmetic, so arbitrarily long literals fail the same way instead of overflowing.
pub fn evaluate(tok: &Token) -> Result<u8> {
    let radix = match tok.kind {
        TokenKind::Lit(LiteralKind::Hex) => 16,
        TokenKind::Lit(LiteralKind::Bin) => 2,
        TokenKind::Lit(LiteralKind::Dec) => 10,
        _ => return Err(error::encode_unexpected(tok, "numeric literal")),
    };
    let val = tok.text.chars().try_fold(0u32, |acc, c| {
        let digit = c.to_digit(radix)?;
        acc.checked_mul(radix)?.checked_add(digit)
    });
    match val.and_then(|val| u8::try_from(val).ok()) {
        Some(byte) => Ok(byte),
        None => Err(error::lit_range(tok)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn eval(src: &str) -> Result<u8> {
        let toks = tokenize(src).unwrap();
        evaluate(&toks[0])
    }

    #[test]
    fn same_value_in_every_base() {
        for val in [0u32, 1, 7, 10, 128, 200, 255] {
            let hex = eval(&format!("0x{val:X}")).unwrap();
            let bin = eval(&format!("0b{val:b}")).unwrap();
            let dec = eval(&val.to_string()).unwrap();
            assert_eq!(hex as u32, val);
            assert_eq!(bin as u32, val);
            assert_eq!(dec as u32, val);
        }
    }

    #[test]
    fn max_byte() {
        assert_eq!(eval("0xFF").unwrap(), 255);
        assert_eq!(eval("0b11111111").unwrap(), 255);
        assert_eq!(eval("255").unwrap(), 255);
    }

    #[test]
    fn leading_zeros() {
        assert_eq!(eval("0x000f").unwrap(), 15);
        assert_eq!(eval("0b00000001").unwrap(), 1);
        assert_eq!(eval("007").unwrap(), 7);
    }

    #[test]
    fn out_of_range_in_every_base() {
        for src in ["0x100", "0b100000000", "256", "99999999999999999999999", "0xffffffffffff"] {
            let err = eval(src).unwrap_err();
            assert_eq!(err.code().unwrap().to_string(), "lit::range", "{src}");
        }
    }

    #[test]
    fn non_literal_rejected() {
        let err = eval("nop").unwrap_err();
        assert_eq!(err.code().unwrap().to_string(), "encode::unexpected_token");
    }
}
