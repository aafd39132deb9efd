//! A small selector engine for `query_selector`, `closest` and `matches`.
//!
//! Supported grammar:
//! - selector lists separated by `,`
//! - compound selectors: `tag`, `*`, `#id`, `.class`, `[attr]`,
//!   `[attr=v]`, `[attr~=v]`, `[attr^=v]`, `[attr$=v]`, `[attr*=v]`
//!   (values may be quoted with `'` or `"`)
//! - descendant (whitespace) and child (`>`) combinators
//!
//! Tag and attribute names compare ASCII case-insensitively; values and ids
//! compare exactly.

use crate::{Document, Id};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected {found:?} at byte {pos}")]
    Unexpected { found: char, pos: usize },
    #[error("unexpected end of selector")]
    UnexpectedEnd,
    #[error("unterminated string starting at byte {pos}")]
    UnterminatedString { pos: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals(String),
    Includes(String),
    Prefix(String),
    Suffix(String),
    Substring(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct AttrSelector {
    name: String,
    op: AttrOp,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attrs: Vec<AttrSelector>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// Compounds right-to-left: `parts[0]` is the subject, each following entry
/// carries the combinator that links it to the previous one.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Complex {
    subject: Compound,
    ancestors: Vec<(Combinator, Compound)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorList {
    selectors: Vec<Complex>,
}

impl SelectorList {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut parser = Parser {
            src: input,
            pos: 0,
        };
        let mut selectors = vec![parser.complex()?];
        loop {
            parser.skip_ws();
            match parser.peek() {
                None => break,
                Some(',') => {
                    parser.bump();
                    selectors.push(parser.complex()?);
                }
                Some(found) => {
                    return Err(SelectorError::Unexpected {
                        found,
                        pos: parser.pos,
                    });
                }
            }
        }
        Ok(Self { selectors })
    }

    /// Returns `true` if the element `id` matches any selector in the list.
    pub fn matches(&self, doc: &Document, id: Id) -> bool {
        doc.is_element(id) && self.selectors.iter().any(|s| s.matches(doc, id))
    }
}

impl Complex {
    fn matches(&self, doc: &Document, id: Id) -> bool {
        self.subject.matches(doc, id) && self.match_ancestors(doc, id, 0)
    }

    fn match_ancestors(&self, doc: &Document, id: Id, step: usize) -> bool {
        let Some((combinator, compound)) = self.ancestors.get(step) else {
            return true;
        };
        match combinator {
            Combinator::Child => doc
                .parent(id)
                .filter(|p| doc.is_element(*p) && compound.matches(doc, *p))
                .is_some_and(|p| self.match_ancestors(doc, p, step + 1)),
            Combinator::Descendant => doc
                .ancestors(id)
                .filter(|a| doc.is_element(*a) && compound.matches(doc, *a))
                .any(|a| self.match_ancestors(doc, a, step + 1)),
        }
    }
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.ids.is_empty() && self.classes.is_empty() && self.attrs.is_empty()
    }

    fn matches(&self, doc: &Document, id: Id) -> bool {
        if let Some(tag) = &self.tag
            && tag != "*"
            && !doc.is_element_named(id, tag)
        {
            return false;
        }
        if !self.ids.iter().all(|want| doc.attr(id, "id") == Some(want.as_str())) {
            return false;
        }
        if !self.classes.iter().all(|want| {
            doc.attr(id, "class")
                .is_some_and(|list| list.split_ascii_whitespace().any(|c| c == want))
        }) {
            return false;
        }
        self.attrs.iter().all(|a| {
            let Some(value) = doc.attr(id, &a.name) else {
                return false;
            };
            match &a.op {
                AttrOp::Exists => true,
                AttrOp::Equals(v) => value == v,
                AttrOp::Includes(v) => value.split_ascii_whitespace().any(|t| t == v),
                AttrOp::Prefix(v) => !v.is_empty() && value.starts_with(v.as_str()),
                AttrOp::Suffix(v) => !v.is_empty() && value.ends_with(v.as_str()),
                AttrOp::Substring(v) => !v.is_empty() && value.contains(v.as_str()),
            }
        })
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.bump();
        }
        self.pos != start
    }

    fn expect(&mut self, want: char) -> Result<(), SelectorError> {
        match self.bump() {
            Some(c) if c == want => Ok(()),
            Some(found) => Err(SelectorError::Unexpected {
                found,
                pos: self.pos - found.len_utf8(),
            }),
            None => Err(SelectorError::UnexpectedEnd),
        }
    }

    fn complex(&mut self) -> Result<Complex, SelectorError> {
        self.skip_ws();
        if self.peek().is_none() {
            return Err(if self.src.trim().is_empty() {
                SelectorError::Empty
            } else {
                SelectorError::UnexpectedEnd
            });
        }

        // Parsed left-to-right, stored right-to-left.
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();
        loop {
            let had_ws = self.skip_ws();
            let combinator = match self.peek() {
                Some('>') => {
                    self.bump();
                    self.skip_ws();
                    Combinator::Child
                }
                Some(c) if had_ws && c != ',' => Combinator::Descendant,
                _ => break,
            };
            if self.peek().is_none() {
                return Err(SelectorError::UnexpectedEnd);
            }
            combinators.push(combinator);
            compounds.push(self.compound()?);
        }

        let subject = compounds.pop().unwrap_or_default();
        let mut ancestors = Vec::with_capacity(compounds.len());
        while let (Some(combinator), Some(compound)) = (combinators.pop(), compounds.pop()) {
            ancestors.push((combinator, compound));
        }
        Ok(Complex { subject, ancestors })
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        if self.peek() == Some('*') {
            self.bump();
            compound.tag = Some("*".to_string());
        } else if self.peek().is_some_and(is_ident_char) {
            compound.tag = Some(self.ident()?.to_ascii_lowercase());
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    compound.ids.push(self.ident()?);
                }
                Some('.') => {
                    self.bump();
                    compound.classes.push(self.ident()?);
                }
                Some('[') => {
                    self.bump();
                    compound.attrs.push(self.attribute()?);
                }
                _ => break,
            }
        }

        if compound.is_empty() {
            return match self.peek() {
                Some(found) => Err(SelectorError::Unexpected {
                    found,
                    pos: self.pos,
                }),
                None => Err(SelectorError::UnexpectedEnd),
            };
        }
        Ok(compound)
    }

    fn attribute(&mut self) -> Result<AttrSelector, SelectorError> {
        self.skip_ws();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_ws();
        let op = match self.bump() {
            Some(']') => {
                return Ok(AttrSelector {
                    name,
                    op: AttrOp::Exists,
                });
            }
            Some('=') => '=',
            Some(c @ ('~' | '^' | '$' | '*')) => {
                self.expect('=')?;
                c
            }
            Some(found) => {
                return Err(SelectorError::Unexpected {
                    found,
                    pos: self.pos - found.len_utf8(),
                });
            }
            None => return Err(SelectorError::UnexpectedEnd),
        };
        self.skip_ws();
        let value = match self.peek() {
            Some(q @ ('"' | '\'')) => self.quoted(q)?,
            Some(_) => self.ident()?,
            None => return Err(SelectorError::UnexpectedEnd),
        };
        self.skip_ws();
        self.expect(']')?;

        let op = match op {
            '~' => AttrOp::Includes(value),
            '^' => AttrOp::Prefix(value),
            '$' => AttrOp::Suffix(value),
            '*' => AttrOp::Substring(value),
            _ => AttrOp::Equals(value),
        };
        Ok(AttrSelector { name, op })
    }

    fn quoted(&mut self, quote: char) -> Result<String, SelectorError> {
        let start = self.pos;
        self.bump();
        let body_start = self.pos;
        while let Some(c) = self.bump() {
            if c == quote {
                return Ok(self.src[body_start..self.pos - 1].to_string());
            }
        }
        Err(SelectorError::UnterminatedString { pos: start })
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        if self.pos == start {
            return match self.peek() {
                Some(found) => Err(SelectorError::Unexpected { found, pos: start }),
                None => Err(SelectorError::UnexpectedEnd),
            };
        }
        Ok(self.src[start..self.pos].to_string())
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

impl Document {
    /// First element in document order under `scope` (exclusive) that matches.
    pub fn query_selector(&self, scope: Id, selector: &SelectorList) -> Option<Id> {
        self.descendants(scope)
            .find(|id| selector.matches(self, *id))
    }

    /// Parse-and-query convenience; parse failures surface as errors.
    pub fn query_selector_str(&self, scope: Id, selector: &str) -> Result<Option<Id>, SelectorError> {
        let list = SelectorList::parse(selector)?;
        Ok(self.query_selector(scope, &list))
    }

    pub fn query_selector_all(&self, scope: Id, selector: &SelectorList) -> Vec<Id> {
        self.descendants(scope)
            .filter(|id| selector.matches(self, *id))
            .collect()
    }

    /// Nearest inclusive ancestor of `id` that matches.
    pub fn closest(&self, id: Id, selector: &SelectorList) -> Option<Id> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|a| selector.matches(self, *a))
    }
}
