//! trybuild compile-time tests for component_macros

#[test]
fn trybuild_component_macros() {
    let t = trybuild::TestCases::new();
    t.pass("tests/trybuild/stereotypes_ok.rs");
    t.pass("tests/trybuild/constructor_ok.rs");
}
