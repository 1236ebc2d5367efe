use super::*;

fn g(n: u64) -> GapId {
    GapId(n)
}

fn render(t: &GapTracker, id: u64) -> String {
    t.ring(g(id)).unwrap().to_string()
}

#[test]
fn ring_insertions_keep_the_seam() {
    let mut r = Ring::new();
    assert_eq!(r.to_string(), "(*)");
    r.insert_next(SlotContent::Gap(g(4)));
    assert_eq!(r.to_string(), "[4] (*)");
    r.insert_prev(SlotContent::End);
    assert_eq!(r.to_string(), "[4] (*) ||");
    r.insert_next(SlotContent::Gap(g(5)));
    assert_eq!(r.to_string(), "[4] [5] (*) ||");
    r.move_prev();
    r.move_prev();
    assert_eq!(r.to_string(), "(*) [4] [5] ||");
    assert_eq!(r.star_next(), Some(SlotContent::Gap(g(4))));
    assert_eq!(r.star_prev(), Some(SlotContent::Open));
    r.insert_prev(SlotContent::Gap(g(6)));
    assert_eq!(r.to_string(), "(*) [6] [4] [5] ||");
    assert_eq!(r.gaps(), vec![g(6), g(4), g(5)]);
}

#[test]
fn named_cursors_render_and_restore() {
    let mut r = Ring::new();
    r.insert_next(SlotContent::Gap(g(1)));
    r.name_star(g(9));
    r.move_prev();
    assert_eq!(r.to_string(), "(*) [1] (9)");
    r.clear_star();
    assert_eq!(r.to_string(), "[1] (9)");
    assert!(r.restore_star(g(9)));
    assert!(!r.restore_star(g(3)));
    assert_eq!(r.to_string(), "[1] (*) (9)");
}

#[test]
fn appear_then_disappear() {
    let mut t = GapTracker::new([g(0)]).unwrap();
    assert_eq!(render(&t, 0), "(*)");
    t.apply(Transition::Appear(g(1))).unwrap();
    assert_eq!(render(&t, 1), "(*) ||");
    assert_eq!(t.live(), &[g(0), g(1)]);

    t.apply(Transition::Disappear(g(1))).unwrap();
    assert_eq!(render(&t, 1), "||");
    t.apply(Transition::Disappear(g(0))).unwrap();
    assert_eq!(render(&t, 0), "||");
    assert!(t.live().is_empty());
}

#[test]
fn split_then_merge_then_split_restores_identity() {
    let mut t = GapTracker::new([g(0)]).unwrap();
    t.apply(Transition::Split { gap: g(0), new: g(1) }).unwrap();
    assert_eq!(render(&t, 0), "[1] (*)");
    assert_eq!(render(&t, 1), "(*) (0)");
    assert_eq!(t.live(), &[g(0), g(1)]);

    t.apply(Transition::Merge { gap: g(0), merged: g(1) }).unwrap();
    assert_eq!(render(&t, 0), "(*) [1]");
    assert_eq!(render(&t, 1), "(0)");
    assert_eq!(t.live(), &[g(0)]);
    assert_eq!(t.resolve(g(1)), g(0));

    // nominal 2 is recognized as the identity that merged away
    t.apply(Transition::Split { gap: g(0), new: g(2) }).unwrap();
    assert_eq!(render(&t, 0), "[1] (*)");
    assert_eq!(render(&t, 1), "(*) (0)");
    assert_eq!(t.resolve(g(2)), g(1));
    assert_eq!(t.live(), &[g(0), g(1)]);
    assert!(t.ring(g(2)).is_none());

    // and can merge again through its new nominal id
    t.apply(Transition::Merge { gap: g(0), merged: g(2) }).unwrap();
    assert_eq!(t.live(), &[g(0)]);
    assert_eq!(t.resolve(g(2)), g(0));
}

#[test]
fn merge_of_foreign_gap_inserts_before_star() {
    let mut t = GapTracker::new([g(0), g(1)]).unwrap();
    t.apply(Transition::Merge { gap: g(0), merged: g(1) }).unwrap();
    assert_eq!(render(&t, 0), "(*) [1]");
    assert_eq!(render(&t, 1), "(0)");
    // split looks at NEXT and finds the merged identity
    t.apply(Transition::Split { gap: g(0), new: g(7) }).unwrap();
    assert_eq!(t.resolve(g(7)), g(1));
    assert!(t.is_live(g(1)));
}

#[test]
fn appear_then_merge_keeps_end_marker() {
    let mut t = GapTracker::new([g(0), g(1)]).unwrap();
    t.apply(Transition::Appear(g(2))).unwrap();
    t.apply(Transition::Merge { gap: g(2), merged: g(1) }).unwrap();
    assert_eq!(render(&t, 2), "(*) [1] ||");
    t.apply(Transition::Split { gap: g(2), new: g(3) }).unwrap();
    assert_eq!(render(&t, 2), "[1] (*) ||");
    assert_eq!(t.resolve(g(3)), g(1));
}

#[test]
fn invariant_violations_are_errors() {
    let mut t = GapTracker::new([g(0)]).unwrap();
    assert!(matches!(
        t.apply(Transition::Disappear(g(5))),
        Err(Error::UnknownIdentity(GapId(5)))
    ));
    assert!(matches!(
        t.apply(Transition::Appear(g(0))),
        Err(Error::DuplicateIdentity(GapId(0)))
    ));
    assert!(GapTracker::new([g(3), g(3)]).is_err());

    t.apply(Transition::Appear(g(1))).unwrap();
    t.apply(Transition::Disappear(g(1))).unwrap();
    assert!(matches!(
        t.apply(Transition::Merge { gap: g(0), merged: g(1) }),
        Err(Error::NotLive(GapId(1)))
    ));
    assert!(matches!(
        t.apply(Transition::Split { gap: g(1), new: g(2) }),
        Err(Error::NotLive(GapId(1)))
    ));
}
