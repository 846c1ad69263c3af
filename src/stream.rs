use crate::ast::Token;

/// Forward-only cursor over a token sequence.
///
/// Backtracking moves only the cursor; the tokens themselves are never
/// consumed, so resetting to an earlier position is always valid.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    position: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        TokenStream {
            tokens,
            position: 0,
        }
    }

    /// Opaque cursor position, valid for [`TokenStream::reset`].
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn reset(&mut self, position: usize) {
        self.position = position.min(self.tokens.len());
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    /// Returns the current token and moves past it.
    pub fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    pub fn has_more(&self) -> bool {
        self.position < self.tokens.len()
    }

    pub fn token_at(&self, position: usize) -> Option<&Token> {
        self.tokens.get(position)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl From<Vec<Token>> for TokenStream {
    fn from(tokens: Vec<Token>) -> Self {
        TokenStream::new(tokens)
    }
}
