use slotmap::new_key_type;

new_key_type! {
    /// Arena key of a [`PairGroup`](super::group::PairGroup) inside a molecule.
    pub struct GroupId;
}
