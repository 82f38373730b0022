use crate::{CardId, GroupId};

/// The "currently relevant" box/group/card triple, updated atomically on
/// every press and read by keyboard dispatch. Pressing a card sets all
/// three; pressing a group handle clears the card; pressing the box clears
/// both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionContext {
    box_focused: bool,
    group: Option<GroupId>,
    card: Option<CardId>,
}

impl InteractionContext {
    pub fn current_card(&self) -> Option<CardId> {
        self.card
    }

    pub fn current_group(&self) -> Option<GroupId> {
        self.group
    }

    pub fn box_focused(&self) -> bool {
        self.box_focused
    }

    pub fn press_card(&mut self, card: CardId, group: Option<GroupId>) {
        self.box_focused = true;
        self.group = group;
        self.card = Some(card);
    }

    pub fn press_group(&mut self, group: GroupId) {
        self.box_focused = true;
        self.group = Some(group);
        self.card = None;
    }

    pub fn press_box(&mut self) {
        self.box_focused = true;
        self.group = None;
        self.card = None;
    }

    pub fn card_deleted(&mut self, card: CardId) {
        if self.card == Some(card) {
            self.card = None;
        }
    }

    pub fn group_deleted(&mut self, group: GroupId) {
        if self.group == Some(group) {
            self.group = None;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_updates_the_whole_triple() {
        let mut focus = InteractionContext::default();
        focus.press_card(CardId(4), Some(GroupId(2)));
        assert_eq!(focus.current_card(), Some(CardId(4)));
        assert_eq!(focus.current_group(), Some(GroupId(2)));
        assert!(focus.box_focused());

        focus.press_group(GroupId(3));
        assert_eq!(focus.current_card(), None);
        assert_eq!(focus.current_group(), Some(GroupId(3)));

        focus.press_box();
        assert_eq!(focus.current_card(), None);
        assert_eq!(focus.current_group(), None);
        assert!(focus.box_focused());
    }

    #[test]
    fn deletion_only_clears_matching_entries() {
        let mut focus = InteractionContext::default();
        focus.press_card(CardId(1), Some(GroupId(9)));
        focus.card_deleted(CardId(2));
        assert_eq!(focus.current_card(), Some(CardId(1)));
        focus.card_deleted(CardId(1));
        assert_eq!(focus.current_card(), None);
        focus.group_deleted(GroupId(9));
        assert_eq!(focus.current_group(), None);
    }
}
