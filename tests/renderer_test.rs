use minijinja::Value;
use stencil::error::Error;
use stencil::renderer::{MiniJinjaRenderer, TemplateRenderer};

fn context() -> Value {
    Value::from_serialize(serde_json::json!({
        "name": "my project",
        "count": 3,
        "enabled": true,
        "items": ["a", "b"]
    }))
}

#[test]
fn test_substitution_and_control_flow() {
    let engine = MiniJinjaRenderer::new();
    let template = "{% if enabled %}{{ name }}{% endif %}:{% for i in items %}{{ i }}{% endfor %}:{{ count * 2 + 1 }}";
    assert_eq!(engine.render("t", template, &context()).unwrap(), "my project:ab:7");
}

#[test]
fn test_trailing_newline_is_kept() {
    let engine = MiniJinjaRenderer::new();
    assert_eq!(engine.render("t", "{{ name }}\n", &context()).unwrap(), "my project\n");
}

#[test]
fn test_no_html_escaping() {
    let engine = MiniJinjaRenderer::new();
    let ctx = Value::from_serialize(serde_json::json!({"tag": "<a href=\"x\">&</a>"}));
    assert_eq!(engine.render("index.html", "{{ tag }}", &ctx).unwrap(), "<a href=\"x\">&</a>");
    assert_eq!(engine.render("data.json", "{{ tag }}", &ctx).unwrap(), "<a href=\"x\">&</a>");
}

#[test]
fn test_undefined_variable_is_an_error() {
    let engine = MiniJinjaRenderer::new();
    let result = engine.render("t", "Hello {{ missing }}", &context());
    assert!(matches!(result, Err(Error::MinijinjaError(_))));
}

#[test]
fn test_syntax_error() {
    let engine = MiniJinjaRenderer::new();
    assert!(engine.render("t", "{% if %}", &context()).is_err());
}

#[test]
fn test_case_helpers() {
    let engine = MiniJinjaRenderer::new();
    let cases = [
        ("{{ name | snake_case }}", "my_project"),
        ("{{ name | kebab_case }}", "my-project"),
        ("{{ name | camel_case }}", "myProject"),
        ("{{ name | pascal_case }}", "MyProject"),
        ("{{ name | screaming_snake_case }}", "MY_PROJECT"),
        ("{{ name | upper }}", "MY PROJECT"),
    ];
    for (template, expected) in cases {
        assert_eq!(engine.render("t", template, &context()).unwrap(), expected, "{template}");
    }
}

#[test]
fn test_generator_helpers() {
    let engine = MiniJinjaRenderer::new();

    let id = engine.render("t", "{{ uuid() }}", &context()).unwrap();
    assert_eq!(id.len(), 36);
    assert_eq!(id.matches('-').count(), 4);

    let password = engine.render("t", "{{ password(32) }}", &context()).unwrap();
    assert_eq!(password.len(), 32);

    let year = engine.render("t", "{{ now('%Y') }}", &context()).unwrap();
    assert_eq!(year.len(), 4);
    assert!(year.chars().all(|c| c.is_ascii_digit()));

    let n = engine.render("t", "{{ random_int(7, 7) }}", &context()).unwrap();
    assert_eq!(n, "7");
}

#[test]
fn test_render_to_writer() {
    let engine = MiniJinjaRenderer::new();
    let mut out = Vec::new();
    engine.render_to("t", "Hi {{ name }}", &context(), &mut out).unwrap();
    assert_eq!(out, b"Hi my project");
}
