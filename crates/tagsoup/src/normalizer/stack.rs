//! Stack of open elements.

use crate::ident::TagId;

/// Open-tag identifiers, index 0 = outermost.
#[derive(Clone, Debug, Default)]
pub(crate) struct OpenElementStack {
    items: Vec<TagId>,
    max_depth: u32,
}

impl OpenElementStack {
    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    pub(crate) fn push(&mut self, tag: TagId) {
        self.items.push(tag);
        self.max_depth = self.max_depth.max(self.items.len() as u32);
    }

    pub(crate) fn pop(&mut self) -> Option<TagId> {
        self.items.pop()
    }

    pub(crate) fn current(&self) -> Option<TagId> {
        self.items.last().copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = TagId> + '_ {
        self.items.iter().copied()
    }

    /// Index of the innermost entry equal to `tag`.
    pub(crate) fn rposition(&self, tag: TagId) -> Option<usize> {
        self.items.iter().rposition(|&open| open == tag)
    }

    /// Index of the outermost entry satisfying `pred`.
    pub(crate) fn position(&self, pred: impl Fn(TagId) -> bool) -> Option<usize> {
        self.items.iter().position(|&open| pred(open))
    }
}

#[cfg(test)]
mod tests {
    use super::OpenElementStack;
    use crate::ident::identify;

    #[test]
    fn open_elements_push_pop_and_current_are_deterministic() {
        let div = identify("div", false);
        let span = identify("span", false);
        let mut stack = OpenElementStack::default();

        assert!(stack.current().is_none());
        stack.push(div);
        assert_eq!(stack.current(), Some(div));
        stack.push(span);
        assert_eq!(stack.current(), Some(span));
        assert_eq!(stack.pop(), Some(span));
        assert_eq!(stack.current(), Some(div));
        assert_eq!(stack.max_depth(), 2);
        stack.clear();
        assert!(stack.is_empty());
        assert_eq!(stack.max_depth(), 2);
    }

    #[test]
    fn searches_run_from_opposite_ends() {
        let a = identify("a", false);
        let b = identify("b", false);
        let mut stack = OpenElementStack::default();
        stack.push(a);
        stack.push(b);
        stack.push(a);

        assert_eq!(stack.rposition(a), Some(2));
        assert_eq!(stack.position(|tag| tag == a), Some(0));
        assert_eq!(stack.position(|tag| tag == b), Some(1));
        assert_eq!(stack.rposition(identify("c", false)), None);
        assert_eq!(stack.iter().collect::<Vec<_>>(), vec![a, b, a]);
    }
}
