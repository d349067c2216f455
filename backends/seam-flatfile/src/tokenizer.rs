use seam_core::error::{Error, QueryResult};

/// The smallest meaningful units of the statement language.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // --- Keywords ---
    Create,
    Drop,
    Table,
    If,
    Not,
    Exists,
    Insert,
    Into,
    Values,
    Update,
    Set,
    Delete,
    Select,
    From,
    Where,
    And,
    Or,
    Like,
    Order,
    By,
    Asc,
    Desc,
    Limit,
    Begin,
    Commit,
    Rollback,
    True,
    False,

    // --- Identifiers & Literals ---
    /// A table or column name, bare or between double quotes.
    Ident(String),
    /// A numeric literal, kept as written.
    Number(String),
    /// A string literal between single quotes, `''` unescaped.
    String(String),
    /// A bind placeholder, sigil included (`@name` or `:name`).
    Param(String),

    // --- Symbols ---
    LeftParen,
    RightParen,
    Comma,
    Semicolon,
    Star,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    Eof,
}

/// Converts a statement into a sequence of [`Token`]s.
pub struct Tokenizer {
    input: Vec<char>,
    position: usize,
}

impl Tokenizer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Processes the whole input. The last token is always [`Token::Eof`].
    pub fn tokenize(mut self) -> QueryResult<Vec<Token>> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            if self.is_at_end() {
                break;
            }
            tokens.push(self.next_token()?);
        }

        tokens.push(Token::Eof);
        Ok(tokens)
    }

    fn next_token(&mut self) -> QueryResult<Token> {
        let ch = self.current_char();

        let single = match ch {
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            ',' => Some(Token::Comma),
            ';' => Some(Token::Semicolon),
            '*' => Some(Token::Star),
            '=' => Some(Token::Equal),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return Ok(token);
        }

        match ch {
            '<' => {
                self.advance();
                Ok(match self.peek() {
                    Some('=') => self.then(Token::LessEqual),
                    Some('>') => self.then(Token::NotEqual),
                    _ => Token::Less,
                })
            }
            '>' => {
                self.advance();
                Ok(match self.peek() {
                    Some('=') => self.then(Token::GreaterEqual),
                    _ => Token::Greater,
                })
            }
            '!' => {
                self.advance();
                match self.peek() {
                    Some('=') => Ok(self.then(Token::NotEqual)),
                    _ => Err(Error::invalid_statement("expected `=` after `!`")),
                }
            }
            '\'' => self.read_string(),
            '"' => self.read_quoted_identifier(),
            '@' | ':' => self.read_param(),
            '-' | '.' => self.read_number(),
            c if c.is_ascii_digit() => self.read_number(),
            c if c.is_alphabetic() || c == '_' => Ok(self.read_identifier()),
            _ => Err(Error::invalid_statement(format!(
                "character {:?} is not supported",
                ch
            ))),
        }
    }

    // --- Navigation Helpers ---

    fn current_char(&self) -> char {
        self.input[self.position]
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    /// Consumes the current char and returns `token`.
    fn then(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    fn take_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if !(c.is_alphanumeric() || c == '_') {
                break;
            }
            word.push(c);
            self.advance();
        }
        word
    }

    // --- Extraction Logic ---

    /// Keywords are matched case-insensitively, anything else is an identifier.
    fn read_identifier(&mut self) -> Token {
        let ident = self.take_word();

        match ident.to_uppercase().as_str() {
            "CREATE" => Token::Create,
            "DROP" => Token::Drop,
            "TABLE" => Token::Table,
            "IF" => Token::If,
            "NOT" => Token::Not,
            "EXISTS" => Token::Exists,
            "INSERT" => Token::Insert,
            "INTO" => Token::Into,
            "VALUES" => Token::Values,
            "UPDATE" => Token::Update,
            "SET" => Token::Set,
            "DELETE" => Token::Delete,
            "SELECT" => Token::Select,
            "FROM" => Token::From,
            "WHERE" => Token::Where,
            "AND" => Token::And,
            "OR" => Token::Or,
            "LIKE" => Token::Like,
            "ORDER" => Token::Order,
            "BY" => Token::By,
            "ASC" => Token::Asc,
            "DESC" => Token::Desc,
            "LIMIT" => Token::Limit,
            "BEGIN" => Token::Begin,
            "COMMIT" => Token::Commit,
            "ROLLBACK" => Token::Rollback,
            "TRUE" => Token::True,
            "FALSE" => Token::False,
            _ => Token::Ident(ident),
        }
    }

    fn read_quoted_identifier(&mut self) -> QueryResult<Token> {
        self.advance();

        let mut ident = String::new();
        loop {
            match self.peek() {
                None => return Err(Error::invalid_statement("unterminated quoted identifier")),
                Some('"') => {
                    self.advance();
                    return Ok(Token::Ident(ident));
                }
                Some(c) => {
                    ident.push(c);
                    self.advance();
                }
            }
        }
    }

    fn read_param(&mut self) -> QueryResult<Token> {
        let sigil = self.current_char();
        self.advance();

        let name = self.take_word();
        if name.is_empty() {
            return Err(Error::invalid_statement(format!(
                "expected a parameter name after `{}`",
                sigil
            )));
        }

        Ok(Token::Param(format!("{}{}", sigil, name)))
    }

    /// Reads an optionally negative integer or decimal literal.
    fn read_number(&mut self) -> QueryResult<Token> {
        let mut number = String::new();
        if self.current_char() == '-' {
            number.push('-');
            self.advance();
        }

        let mut has_dot = false;
        let mut has_digit = false;
        while let Some(c) = self.peek() {
            if c == '.' && !has_dot {
                has_dot = true;
            } else if c.is_ascii_digit() {
                has_digit = true;
            } else {
                break;
            }
            number.push(c);
            self.advance();
        }

        if !has_digit {
            return Err(Error::invalid_statement(format!(
                "invalid number literal `{}`",
                number
            )));
        }
        if self.peek() == Some('.') {
            return Err(Error::invalid_statement(
                "multiple dots are not allowed in a number",
            ));
        }

        Ok(Token::Number(number))
    }

    /// Reads a string literal enclosed in single quotes. `''` stands for one quote.
    fn read_string(&mut self) -> QueryResult<Token> {
        self.advance();

        let mut string = String::new();
        loop {
            match self.peek() {
                None => return Err(Error::invalid_statement("unterminated string")),
                Some('\'') => {
                    self.advance();
                    if self.peek() == Some('\'') {
                        string.push('\'');
                        self.advance();
                    } else {
                        return Ok(Token::String(string));
                    }
                }
                Some(c) => {
                    string.push(c);
                    self.advance();
                }
            }
        }
    }
}
