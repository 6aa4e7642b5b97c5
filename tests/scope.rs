use gogen::scope::{Binding, Scope, StashKey, FILLER_NAME};
use gogen::{AstArena, Node};
use gogen_syntax::parse_source;
use pretty_assertions::assert_eq;

struct Depth;

impl StashKey for Depth {
    type Value = u32;
}

struct Label;

impl StashKey for Label {
    type Value = String;
}

#[test]
fn pick_name_counts_up_from_two() {
    let mut s = Scope::root();
    let picked: Vec<_> = (0..4).map(|_| s.pick_name("v")).collect();
    assert_eq!(picked, ["v", "v2", "v3", "v4"]);
    assert_eq!(s.pick_name(""), FILLER_NAME);
    assert_eq!(s.pick_name(""), format!("{FILLER_NAME}2"));
}

#[test]
fn pick_name_skips_names_visible_from_ancestors() {
    let mut root = Scope::root();
    root.pick_name("i");
    let mut child = root.new_child();
    assert_eq!(child.pick_name("i"), "i2");

    // Siblings do not see each other's picks.
    drop(child);
    let mut sibling = root.new_child();
    assert_eq!(sibling.pick_name("i"), "i2");
}

#[test]
fn lookups_walk_the_parent_chain() {
    let mut arena = AstArena::new();
    let x = Node::Expr(arena.ident_expr("x"));

    let mut root = Scope::root();
    root.declare("x", x);
    let child = root.new_child();
    let grandchild = child.new_child();

    assert_eq!(grandchild.lookup_var("x"), Some(&Binding::Node(x)));
    assert_eq!(grandchild.lookup_var("y"), None);
    assert!(grandchild.parent().is_some());
    assert!(root.parent().is_none());
}

#[test]
fn child_declarations_shadow_without_touching_the_parent() {
    let mut arena = AstArena::new();
    let outer = Node::Expr(arena.ident_expr("outer"));
    let inner = Node::Expr(arena.ident_expr("inner"));

    let mut root = Scope::root();
    root.declare("v", outer);
    {
        let mut child = root.new_child();
        child.declare("v", inner);
        assert_eq!(child.lookup_var("v"), Some(&Binding::Node(inner)));
    }
    assert_eq!(root.lookup_var("v"), Some(&Binding::Node(outer)));
}

#[test]
fn stash_is_keyed_by_type() {
    let mut root = Scope::root();
    assert_eq!(root.lookup_stash::<Depth>(), None);

    assert_eq!(root.insert_stash::<Depth>(1), None);
    root.insert_stash::<Label>("outer".to_owned());
    assert_eq!(root.insert_stash::<Depth>(2), Some(1));

    let mut child = root.new_child();
    assert_eq!(child.lookup_stash::<Depth>(), Some(&2));
    assert_eq!(child.local_stash::<Depth>(), None);

    child.insert_stash::<Label>("inner".to_owned());
    if let Some(label) = child.stash_mut::<Label>() {
        label.push('!');
    }
    assert_eq!(child.lookup_stash::<Label>().map(String::as_str), Some("inner!"));
    assert_eq!(child.remove_stash::<Label>().as_deref(), Some("inner!"));
    assert_eq!(child.lookup_stash::<Label>().map(String::as_str), Some("outer"));
}

#[test]
fn reserved_names_are_never_picked() {
    let parsed = parse_source("package p\n\nfunc f(tmp int) {\n\ttmp2 := tmp\n\t_ = tmp2\n}\n").unwrap();
    let mut root = Scope::root();
    root.reserve_names(&parsed.arena, Node::File(parsed.file));

    assert_eq!(root.lookup_var("tmp"), Some(&Binding::Reserved));
    assert!(root.is_visible("f"));
    assert!(root.is_visible("p"));
    assert_eq!(root.pick_name("tmp"), "tmp3");
}

proptest::proptest! {
    #[test]
    fn picked_names_were_never_visible(
        taken in proptest::collection::vec("[ab][2-4]?", 0..8),
        prefix in "[ab]?",
        picks in 1usize..6,
    ) {
        let mut root = Scope::root();
        for name in &taken {
            root.reserve(name.as_str());
        }
        let mut child = root.new_child();
        let mut seen = taken.clone();
        for _ in 0..picks {
            let name = child.pick_name(&prefix);
            proptest::prop_assert!(!seen.contains(&name), "{name} was already visible");
            proptest::prop_assert!(child.is_visible(&name));
            seen.push(name);
        }
    }
}
