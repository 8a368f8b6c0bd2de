//! Indentation state shared by the YAML emitter and parser.
//!
//! The prefix of a line is a sequence of tokens, each either two spaces or an array
//! marker `"- "`. A nested node receives a copy of its parent's sequence with one more
//! token; once a child has written a line every token is turned back into spaces, so
//! that only the first line of an array element carries its dash. A child that writes
//! nothing, such as an unkeyed empty container, leaves the dashes for its next sibling.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Token {
    Tab,
    Dash,
}

impl Token {
    const fn as_str(self) -> &'static str {
        match self {
            Token::Tab => "  ",
            Token::Dash => "- ",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Indent {
    tokens: Vec<Token>,
}

impl Indent {
    pub(crate) fn new() -> Self {
        Indent::default()
    }

    /// A copy of this indent with `token` appended.
    #[must_use]
    pub(crate) fn with(&self, token: Token) -> Self {
        let mut tokens = Vec::with_capacity(self.tokens.len() + 1);
        tokens.extend_from_slice(&self.tokens);
        tokens.push(token);
        Indent { tokens }
    }

    /// Turns every dash into spaces.
    pub(crate) fn settle(&mut self) {
        for token in &mut self.tokens {
            *token = Token::Tab;
        }
    }

    /// The header of a keyed container has been handled: its children sit one level
    /// deeper, aligned under the text that followed any dash.
    #[must_use]
    pub(crate) fn descend(mut self) -> Self {
        self.settle();
        self.tokens.push(Token::Tab);
        self
    }

    pub(crate) fn write_prefix(&self, out: &mut String) {
        for token in &self.tokens {
            out.push_str(token.as_str());
        }
    }

    pub(crate) fn prefix(&self) -> String {
        let mut out = String::with_capacity(self.tokens.len() * 2);
        self.write_prefix(&mut out);
        out
    }
}
