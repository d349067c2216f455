use crate::ast::*;
use crate::encode::encode;
use crate::tokenizer::{Token, Tokenizer};
use seam_core::error::{Error, QueryResult};
use seam_core::{Binds, DataType};

/// Parses a complete statement, resolving its placeholders against `binds`.
pub(crate) fn statement(sql: &str, binds: &Binds) -> QueryResult<Statement> {
    Parser::new(sql, binds)?.parse_statement()
}

/// Parses a standalone condition. An empty condition is `None`.
pub(crate) fn condition(text: &str) -> QueryResult<Option<Condition>> {
    let binds = Binds::new();
    let mut parser = Parser::new(text, &binds)?;
    if parser.is_at_end() {
        return Ok(None);
    }

    let condition = parser.parse_condition()?;
    parser.finish()?;
    Ok(Some(condition))
}

/// Parses a standalone column list, `*` or comma separated names.
pub(crate) fn columns(text: &str) -> QueryResult<Columns> {
    let binds = Binds::new();
    let mut parser = Parser::new(text, &binds)?;
    let columns = parser.parse_columns()?;
    parser.finish()?;
    Ok(columns)
}

pub struct Parser<'b> {
    tokens: Vec<Token>,
    position: usize,
    binds: &'b Binds,
}

impl<'b> Parser<'b> {
    pub fn new(input: &str, binds: &'b Binds) -> QueryResult<Self> {
        Ok(Self {
            tokens: Tokenizer::new(input).tokenize()?,
            position: 0,
            binds,
        })
    }

    pub fn parse_statement(mut self) -> QueryResult<Statement> {
        let statement = match self.current_token() {
            Token::Create => self.parse_create_table(),
            Token::Drop => self.parse_drop_table(),
            Token::Insert => self.parse_insert(),
            Token::Update => self.parse_update(),
            Token::Delete => self.parse_delete(),
            Token::Select => self.parse_select().map(Statement::Select),
            Token::Begin => Ok(self.single(Statement::Begin)),
            Token::Commit => Ok(self.single(Statement::Commit)),
            Token::Rollback => Ok(self.single(Statement::Rollback)),
            other => Err(unexpected("a statement", other)),
        }?;

        self.finish()?;
        Ok(statement)
    }

    // --- Helpers ---

    fn current_token(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current_token(), Token::Eof)
    }

    /// Accepts an optional trailing semicolon, then requires the end of input.
    fn finish(&mut self) -> QueryResult<()> {
        if matches!(self.current_token(), Token::Semicolon) {
            self.advance();
        }

        if self.is_at_end() {
            Ok(())
        } else {
            Err(unexpected("end of statement", self.current_token()))
        }
    }

    fn single(&mut self, statement: Statement) -> Statement {
        self.advance();
        statement
    }

    /// Consumes the current token if it is `expected`.
    fn eat(&mut self, expected: &Token) -> bool {
        if self.current_token() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, expected: Token) -> QueryResult<()> {
        if self.eat(&expected) {
            Ok(())
        } else {
            Err(unexpected(&format!("{:?}", expected), self.current_token()))
        }
    }

    fn consume_ident(&mut self) -> QueryResult<String> {
        match self.current_token() {
            Token::Ident(ident) => {
                let ident = ident.clone();
                self.advance();
                Ok(ident)
            }
            other => Err(unexpected("an identifier", other)),
        }
    }

    fn consume_number(&mut self) -> QueryResult<String> {
        match self.current_token() {
            Token::Number(number) => {
                let number = number.clone();
                self.advance();
                Ok(number)
            }
            other => Err(unexpected("a number", other)),
        }
    }

    /// Parses `item (, item)*`.
    fn comma_separated<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> QueryResult<T>,
    ) -> QueryResult<Vec<T>> {
        let mut items = vec![item(self)?];
        while self.eat(&Token::Comma) {
            items.push(item(self)?);
        }
        Ok(items)
    }

    fn parenthesized<T>(
        &mut self,
        item: impl FnMut(&mut Self) -> QueryResult<T>,
    ) -> QueryResult<Vec<T>> {
        self.consume(Token::LeftParen)?;
        let items = self.comma_separated(item)?;
        self.consume(Token::RightParen)?;
        Ok(items)
    }

    fn parse_where(&mut self) -> QueryResult<Option<Condition>> {
        if self.eat(&Token::Where) {
            self.parse_condition().map(Some)
        } else {
            Ok(None)
        }
    }

    // --- Literals ---

    fn parse_literal(&mut self) -> QueryResult<Literal> {
        let literal = match self.current_token() {
            Token::String(text) | Token::Number(text) => Literal::untyped(text.clone()),
            Token::True => Literal::untyped("True"),
            Token::False => Literal::untyped("False"),
            Token::Param(name) => self.resolve(name)?,
            other => return Err(unexpected("a literal", other)),
        };

        self.advance();
        Ok(literal)
    }

    /// Looks a placeholder up by its full name, then without its sigil.
    fn resolve(&self, name: &str) -> QueryResult<Literal> {
        let bind = self
            .binds
            .get(name)
            .or_else(|| self.binds.get(&name[1..]))
            .ok_or_else(|| Error::invalid_statement(format!("no value bound to `{}`", name)))?;

        Ok(Literal {
            text: encode(bind.value(), bind.data_type())?,
            data_type: Some(bind.data_type()),
        })
    }

    // --- Conditions ---

    /// `AND` binds tighter than `OR`.
    fn parse_condition(&mut self) -> QueryResult<Condition> {
        let mut left = self.parse_conjunction()?;
        while self.eat(&Token::Or) {
            let right = self.parse_conjunction()?;
            left = Condition::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_conjunction(&mut self) -> QueryResult<Condition> {
        let mut left = self.parse_unary()?;
        while self.eat(&Token::And) {
            let right = self.parse_unary()?;
            left = Condition::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> QueryResult<Condition> {
        if self.eat(&Token::Not) {
            return Ok(Condition::Not(Box::new(self.parse_unary()?)));
        }

        if self.eat(&Token::LeftParen) {
            let condition = self.parse_condition()?;
            self.consume(Token::RightParen)?;
            return Ok(condition);
        }

        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> QueryResult<Condition> {
        let column = self.consume_ident()?;

        let op = match self.current_token() {
            Token::Equal => CompareOp::Equal,
            Token::NotEqual => CompareOp::NotEqual,
            Token::Less => CompareOp::Less,
            Token::LessEqual => CompareOp::LessEqual,
            Token::Greater => CompareOp::Greater,
            Token::GreaterEqual => CompareOp::GreaterEqual,
            Token::Like | Token::Not => {
                let negated = self.eat(&Token::Not);
                self.consume(Token::Like)?;
                let pattern = self.parse_literal()?.text;

                return Ok(Condition::Like {
                    column,
                    pattern,
                    negated,
                });
            }
            other => return Err(unexpected("a comparison operator", other)),
        };
        self.advance();

        let value = self.parse_literal()?.text;
        Ok(Condition::Compare { column, op, value })
    }

    // --- Statements ---

    fn parse_columns(&mut self) -> QueryResult<Columns> {
        if self.eat(&Token::Star) {
            Ok(Columns::All)
        } else {
            self.comma_separated(Self::consume_ident).map(Columns::Named)
        }
    }

    fn parse_column_def(&mut self) -> QueryResult<ColumnDef> {
        let name = self.consume_ident()?;

        let data_type = match self.current_token() {
            Token::Ident(ty) => {
                let ty = ty
                    .parse::<DataType>()
                    .map_err(|err| Error::invalid_statement(err.to_string()))?;
                self.advance();
                // Length modifiers such as `VARCHAR(64)` are accepted and ignored.
                if self.eat(&Token::LeftParen) {
                    self.consume_number()?;
                    self.consume(Token::RightParen)?;
                }
                Some(ty)
            }
            _ => None,
        };

        Ok(ColumnDef { name, data_type })
    }

    fn parse_create_table(&mut self) -> QueryResult<Statement> {
        self.consume(Token::Create)?;
        self.consume(Token::Table)?;

        let if_not_exists = self.eat(&Token::If);
        if if_not_exists {
            self.consume(Token::Not)?;
            self.consume(Token::Exists)?;
        }

        let name = self.consume_ident()?;
        let columns = self.parenthesized(Self::parse_column_def)?;

        Ok(Statement::CreateTable(CreateTable {
            name,
            if_not_exists,
            columns,
        }))
    }

    fn parse_drop_table(&mut self) -> QueryResult<Statement> {
        self.consume(Token::Drop)?;
        self.consume(Token::Table)?;

        let if_exists = self.eat(&Token::If);
        if if_exists {
            self.consume(Token::Exists)?;
        }

        let name = self.consume_ident()?;
        Ok(Statement::DropTable { name, if_exists })
    }

    fn parse_insert(&mut self) -> QueryResult<Statement> {
        self.consume(Token::Insert)?;
        self.consume(Token::Into)?;
        let table = self.consume_ident()?;

        let columns = if self.current_token() == &Token::LeftParen {
            Some(self.parenthesized(Self::consume_ident)?)
        } else {
            None
        };

        self.consume(Token::Values)?;
        let rows = self.comma_separated(|parser| parser.parenthesized(Self::parse_literal))?;

        Ok(Statement::Insert(Insert {
            table,
            columns,
            rows,
        }))
    }

    fn parse_update(&mut self) -> QueryResult<Statement> {
        self.consume(Token::Update)?;
        let table = self.consume_ident()?;
        self.consume(Token::Set)?;

        let assignments = self.comma_separated(|parser| {
            let column = parser.consume_ident()?;
            parser.consume(Token::Equal)?;
            Ok((column, parser.parse_literal()?))
        })?;
        let condition = self.parse_where()?;

        Ok(Statement::Update(Update {
            table,
            assignments,
            condition,
        }))
    }

    fn parse_delete(&mut self) -> QueryResult<Statement> {
        self.consume(Token::Delete)?;
        self.consume(Token::From)?;
        let table = self.consume_ident()?;
        let condition = self.parse_where()?;

        Ok(Statement::Delete { table, condition })
    }

    fn parse_select(&mut self) -> QueryResult<Select> {
        self.consume(Token::Select)?;
        let columns = self.parse_columns()?;
        self.consume(Token::From)?;
        let table = self.consume_ident()?;
        let condition = self.parse_where()?;

        let order_by = if self.eat(&Token::Order) {
            self.consume(Token::By)?;
            let column = self.consume_ident()?;
            let descending = self.eat(&Token::Desc);
            if !descending {
                self.eat(&Token::Asc);
            }
            Some(OrderBy { column, descending })
        } else {
            None
        };

        let limit = if self.eat(&Token::Limit) {
            let number = self.consume_number()?;
            let limit = number
                .parse::<usize>()
                .map_err(|_| Error::invalid_statement(format!("invalid LIMIT `{}`", number)))?;
            Some(limit)
        } else {
            None
        };

        Ok(Select {
            columns,
            table,
            condition,
            order_by,
            limit,
        })
    }
}

fn unexpected(expected: &str, found: &Token) -> Error {
    Error::invalid_statement(format!("expected {}, found {:?}", expected, found))
}
