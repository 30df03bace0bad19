// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

use crate::cst::Node;

/// The chain of origin nodes enclosing the node currently being translated.
///
/// The translator pushes a node before visiting it and pops it afterwards, so
/// the top of the stack is always the node being visited.
#[derive(Debug, Default)]
pub struct AncestorStack<'a> {
    frames: Vec<&'a Node>,
}

impl<'a> AncestorStack<'a> {
    pub fn new() -> Self {
        Self { frames: vec![] }
    }

    pub fn push(&mut self, node: &'a Node) {
        self.frames.push(node);
    }

    pub fn pop(&mut self) -> Option<&'a Node> {
        self.frames.pop()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The node `depth` levels above the one being visited; `peek(0)` is the node
    /// itself. `None` once past the root.
    pub fn peek(&self, depth: usize) -> Option<&'a Node> {
        let index = self.frames.len().checked_sub(depth.checked_add(1)?)?;
        self.frames.get(index).copied()
    }

    pub fn parent(&self) -> Option<&'a Node> {
        self.peek(1)
    }

    /// Ancestors of the current node, nearest first, each paired with the child
    /// through which it was entered.
    pub fn lineage(&self) -> impl Iterator<Item = (&'a Node, &'a Node)> + '_ {
        self.frames
            .windows(2)
            .rev()
            .map(|pair| (pair[0], pair[1]))
    }
}
