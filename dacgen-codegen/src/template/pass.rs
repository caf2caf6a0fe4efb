use std::collections::HashMap;

/// Transient state of one render.
///
/// Holds the per-level, per-instance input positions used by stateful
/// keywords such as `Join`. A pass must not be shared between two renders:
/// positions left over from an earlier render would make the first item of
/// the next one look like a later item.
#[derive(Debug, Default)]
pub struct RenderPass {
    positions: HashMap<(usize, usize), usize>,
}

impl RenderPass {
    pub fn new() -> Self {
        Self::default()
    }

    /// A section at `level` is starting; forget positions at that level and
    /// every deeper one.
    pub fn enter_block(&mut self, level: usize) {
        self.positions.retain(|(l, _), _| *l < level);
    }

    /// Return the current position of a keyword instance and advance it.
    pub fn next_position(&mut self, level: usize, instance: usize) -> usize {
        let position = self.positions.entry((level, instance)).or_insert(0);
        let current = *position;
        *position += 1;
        current
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_advance_per_instance() {
        let mut pass = RenderPass::new();
        assert_eq!(pass.next_position(1, 10), 0);
        assert_eq!(pass.next_position(1, 10), 1);
        assert_eq!(pass.next_position(1, 20), 0);
        assert_eq!(pass.next_position(2, 10), 0);
    }

    #[test]
    fn test_enter_block_clears_level_and_deeper() {
        let mut pass = RenderPass::new();
        pass.next_position(0, 1);
        pass.next_position(1, 1);
        pass.next_position(2, 1);

        pass.enter_block(1);

        assert_eq!(pass.next_position(0, 1), 1);
        assert_eq!(pass.next_position(1, 1), 0);
        assert_eq!(pass.next_position(2, 1), 0);
    }
}
