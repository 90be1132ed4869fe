//! Positional locator for nodes inside a manifest

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Field(&'static str),
    Index(usize),
}

/// Stack of field names and indices, rendered as `menus[2].children[0]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePath {
    segments: Vec<Segment>,
}

impl NodePath {
    pub fn root(field: &'static str) -> Self {
        Self {
            segments: vec![Segment::Field(field)],
        }
    }

    pub fn push_field(&mut self, field: &'static str) {
        self.segments.push(Segment::Field(field));
    }

    pub fn push_index(&mut self, index: usize) {
        self.segments.push(Segment::Index(index));
    }

    pub fn pop(&mut self) {
        self.segments.pop();
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Field(name) if position == 0 => write!(f, "{}", name)?,
                Segment::Field(name) => write!(f, ".{}", name)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}
