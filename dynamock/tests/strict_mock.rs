// vim: tw=80
//! A strict mock rejects every call that it wasn't told to accept.
#![deny(warnings)]

use dynamock::*;

#[mockable]
pub trait StringList {
    fn add(&mut self, item: String);
    fn index_of(&self, item: &str) -> i32;
    fn get(&self, index: usize) -> Option<String>;
}

#[test]
#[should_panic(expected = "unexpected call: StringList::add(\"some text\")")]
fn call_without_binding() {
    let mut list = MockStringList::strict();
    list.add(String::from("some text"));
}

#[test]
#[should_panic(expected = "unmet expectations:\n    StringList::add(var == \"some text\"): expected exactly 1 call(s), received 0")]
fn expected_method_not_called() {
    let mut list = MockStringList::strict();
    list.expect_add()
        .with(arg::text::is("some text"));
    list.verify_all_expectations();
}

#[test]
fn expected_call() {
    let mut list = MockStringList::strict();
    list.expect_add()
        .with(arg::text::is("some text"));
    list.add(String::from("some text"));
    list.verify_all_expectations();
}

#[test]
#[should_panic(expected = "unexpected call: StringList::add(\"other text\")")]
fn second_call_fails_by_default() {
    let mut list = MockStringList::strict();
    list.expect_add()
        .with(arg::text::is("some text"));
    list.add(String::from("some text"));
    list.add(String::from("other text"));
}

#[test]
#[should_panic(expected = "StringList::add(\"some text\"): expected exactly 1 call(s), this would be call 2")]
fn over_satisfied() {
    let mut list = MockStringList::strict();
    list.expect_add()
        .with(arg::text::is("some text"));
    list.add(String::from("some text"));
    list.add(String::from("some text"));
}

#[test]
#[should_panic(expected = "unexpected call: StringList::add(\"other text\")")]
fn unexpected_arguments() {
    let mut list = MockStringList::strict();
    list.expect_add()
        .with(arg::text::is("some text"));
    list.add(String::from("other text"));
}

#[test]
#[should_panic(expected = "expected exactly 2 call(s), received 1")]
fn not_called_enough_times() {
    let mut list = MockStringList::strict();
    list.expect_add()
        .with(arg::text::is("some text"))
        .repeat().twice();
    list.add(String::from("some text"));
    list.verify_all_expectations();
}

#[test]
fn twice() {
    let mut list = MockStringList::strict();
    list.expect_add()
        .with(arg::text::is("some text"))
        .repeat().twice();
    list.add(String::from("some text"));
    list.add(String::from("some text"));
    list.verify_all_expectations();
}

#[test]
fn return_value() {
    let mut list = MockStringList::strict();
    list.expect_index_of()
        .with(arg::text::is("some text"))
        .return_const(1);
    assert_eq!(1, list.index_of("some text"));
    list.verify_all_expectations();
}

#[test]
fn argument_constraint() {
    let mut list = MockStringList::strict();
    list.expect_index_of()
        .with(arg::text::ends_with("text"))
        .return_const(1);
    list.index_of("some text");
    list.verify_all_expectations();
}

#[test]
fn several_constraints() {
    let mut list = MockStringList::strict();
    list.expect_index_of()
        .with(arg::text::ends_with("text"))
        .return_const(1);
    list.expect_index_of()
        .with(arg::matches(|s: &String| s == "why would you do this?"))
        .return_const(2);
    list.expect_index_of()
        .with(arg::is(String::from("soup")))
        .return_const(3);
    assert_eq!(1, list.index_of("some text"));
    assert_eq!(2, list.index_of("why would you do this?"));
    assert_eq!(3, list.index_of("soup"));
    list.verify_all_expectations();
}

#[test]
#[should_panic(expected = "unexpected call: StringList::index_of(\"some words\")")]
fn violated_constraint() {
    let mut list = MockStringList::strict();
    list.expect_index_of()
        .with(arg::text::ends_with("text"))
        .return_const(1);
    list.index_of("some words");
}

#[test]
fn violation_explains_closest_binding() {
    let mut list = MockStringList::strict();
    list.expect_index_of()
        .with(arg::text::ends_with("text"))
        .return_const(1);
    let v = list.mock().try_call::<String, i32>(1, String::from("some words"),
        vec![String::from("\"some words\"")], None)
        .unwrap_err();
    assert_eq!(ViolationKind::UnexpectedCall, v.kind());
    assert!(v.description().contains("closest binding rejected the arguments"),
        "{}", v.description());
}

#[test]
#[should_panic(expected = "unexpected call: StringList::index_of(\"other text\")")]
fn stub_for_specific_arguments() {
    let mut list = MockStringList::strict();
    list.stub_index_of()
        .with(arg::text::is("some text"))
        .return_const(1);
    assert_eq!(1, list.index_of("some text"));
    list.index_of("other text");
}

#[test]
fn stub_not_called() {
    let mut list = MockStringList::strict();
    list.stub_index_of()
        .with(arg::text::is("some text"))
        .return_const(1);
    list.verify_all_expectations();
}

#[test]
fn stub_called_many_times() {
    let mut list = MockStringList::strict();
    list.stub_index_of()
        .with(arg::text::is("some text"))
        .return_const(1);
    assert_eq!(1, list.index_of("some text"));
    assert_eq!(1, list.index_of("some text"));
    assert_eq!(1, list.index_of("some text"));
    list.verify_all_expectations();
}

#[test]
fn default_mode_is_strict() {
    let list = MockStringList::default();
    assert_eq!(Mode::Strict, list.mode());
}

#[test]
fn first_declared_binding_wins() {
    let mut list = MockStringList::strict();
    list.expect_index_of()
        .return_const(1);
    list.expect_index_of()
        .with(arg::text::is("soup"))
        .return_const(2);
    assert_eq!(1, list.index_of("soup"));
    assert_eq!(2, list.index_of("soup"));
    list.verify_all_expectations();
}
