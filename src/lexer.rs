use super::token::{Command, Token};

pub struct Lexer<'a> {
    program: &'a str,
    cursor: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(program: &'a str) -> Self {
        Lexer { program, cursor: 0 }
    }

    /// Get the next token. This consumes the token.
    pub fn next_token(&mut self) -> Option<Token> {
        self.skip_comments();

        let offset = self.cursor;
        self.next_char(false)
            .and_then(Command::from_byte)
            .map(|command| Token::new(command, offset))
    }

    /// Collect the remaining tokens. The compiler needs random access to
    /// look ahead into loop bodies.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::with_capacity(self.program.len());
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        tokens
    }

    /// Skip every byte that is not a command
    fn skip_comments(&mut self) {
        while let Some(ch) = self.next_char(true) {
            if Command::from_byte(ch).is_some() {
                break;
            }
            self.cursor += 1;
        }
    }

    /// Get the next char and increase the cursor if `peek` is false
    fn next_char(&mut self, peek: bool) -> Option<u8> {
        let ch = *self.program.as_bytes().get(self.cursor)?;
        if !peek {
            self.cursor += 1;
        }
        Some(ch)
    }
}
