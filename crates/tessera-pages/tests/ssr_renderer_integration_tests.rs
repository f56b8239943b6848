//! SSR Renderer Integration Tests
//!
//! Test Categories:
//! 1. Elements - attributes, void elements, special props, SVG
//! 2. Composite nodes - lists, fragments, raw templates, comments
//! 3. Function components - bounded re-invocation, hook errors
//! 4. Class components - lifecycle, error boundaries
//! 5. Context - providers, hooks and class child context
//! 6. Determinism

use std::cell::RefCell;
use std::rc::Rc;

use rstest::rstest;
use serial_test::serial;
use tessera_pages::component::{
	ClassComponent, ClassType, FunctionComponent, Node, PropValue, Props, Style, TemplateExpr, h,
};
use tessera_pages::error::{HookError, RenderError, RenderResult};
use tessera_pages::reactive::{Context, ContextScope, ProvidedContext};
use tessera_pages::ssr::{MAX_RERENDER_ATTEMPTS, Markup, SyncRenderer};

fn render(node: &Node) -> String {
	SyncRenderer::new().render_to_string(node).unwrap()
}

// ============================================================================
// Category 1: Elements
// ============================================================================

#[rstest]
#[case("img")]
#[case("br")]
#[case("input")]
#[case("meta")]
fn test_void_elements_never_render_children(#[case] tag: &'static str) {
	let node = h(
		tag,
		Props::new()
			.with("id", "v")
			.with("dangerouslySetInnerHTML", PropValue::InnerHtml("<b>x</b>".into())),
		vec!["ignored".into()],
	);

	let html = render(&node);
	assert_eq!(html, format!(r#"<{tag} id="v"/>"#));
	assert!(!html.contains(&format!("</{tag}>")));
}

#[rstest]
fn test_empty_non_void_element() {
	assert_eq!(render(&h("div", Props::new(), vec![])), "<div></div>");
}

#[rstest]
fn test_attribute_renames() {
	let node = h(
		"label",
		Props::new()
			.with("htmlFor", "q")
			.with("tabIndex", 2)
			.with("aria-hidden", true)
			.with("data-count", 0)
			.with("onClick", PropValue::handler(|| {})),
		vec!["Найти".into()],
	);

	assert_eq!(
		render(&node),
		r#"<label for="q" tabindex="2" aria-hidden="true" data-count="0">Найти</label>"#
	);
}

#[rstest]
fn test_explicit_class_wins_over_class_name() {
	let node = h(
		"p",
		Props::new().with("className", "a").with("class", "b"),
		vec![],
	);
	assert_eq!(render(&node), r#"<p class="b"></p>"#);
}

#[rstest]
fn test_attribute_values_are_escaped() {
	let node = h(
		"a",
		Props::new().with("title", r#"5 > 3 & "quotes" <tag>"#),
		vec!["it's".into()],
	);
	assert_eq!(
		render(&node),
		r#"<a title="5 > 3 &amp; &quot;quotes&quot; &lt;tag>">it's</a>"#
	);
}

#[rstest]
fn test_textarea_value_becomes_content() {
	let node = h("textarea", Props::new().with("value", "a < b"), vec![]);
	assert_eq!(render(&node), "<textarea>a &lt; b</textarea>");
}

#[rstest]
fn test_inner_html_is_not_escaped() {
	let node = h(
		"div",
		Props::new().with("dangerouslySetInnerHTML", PropValue::InnerHtml("<em>raw</em>".into())),
		vec!["child".into()],
	);
	assert_eq!(render(&node), "<div><em>raw</em></div>");
}

#[rstest]
fn test_empty_style_is_omitted() {
	let node = h("div", Props::new().with("style", Style::new()), vec![]);
	assert_eq!(render(&node), "<div></div>");
}

#[rstest]
fn test_svg_attributes_until_foreign_object() {
	let node = h(
		"svg",
		Props::new().with("viewBox", "0 0 10 10"),
		vec![
			h("path", Props::new().with("strokeWidth", 2), vec![]),
			h(
				"foreignObject",
				Props::new(),
				vec![h("div", Props::new().with("strokeWidth", 2), vec![])],
			),
		],
	);

	assert_eq!(
		render(&node),
		concat!(
			r#"<svg viewBox="0 0 10 10"><path stroke-width="2"></path>"#,
			r#"<foreignObject><div strokeWidth="2"></div></foreignObject></svg>"#
		)
	);
}

#[rstest]
#[case("bad tag")]
#[case("a/b")]
#[case("x\"y")]
fn test_invalid_tag_names_fail(#[case] tag: &str) {
	let node = h(tag.to_string(), Props::new(), vec![]);
	let err = SyncRenderer::new().render_to_string(&node).unwrap_err();

	assert!(matches!(err, RenderError::InvalidTagName { .. }));
	assert!(err.to_string().starts_with(&format!("{tag} is not a valid HTML tag name in <")));
}

// ============================================================================
// Category 2: Composite nodes
// ============================================================================

#[rstest]
fn test_lists_skip_empty_values() {
	let node = h(
		"ul",
		Props::new(),
		vec![
			h("li", Props::new(), vec!["a".into()]),
			Node::Null,
			Node::Bool(false),
			h("li", Props::new(), vec![Node::from(2_i32)]),
		],
	);
	assert_eq!(render(&node), "<ul><li>a</li><li>2</li></ul>");
}

#[rstest]
fn test_fragments_and_comments() {
	let node = Node::fragment([
		Node::comment("<note>"),
		Node::from("x"),
		Node::fragment([Node::from("y")]),
	]);
	assert_eq!(render(&node), "<!--&lt;note>-->xy");
}

#[rstest]
fn test_raw_template_interpolation() {
	let node = Node::raw_template(
		["<p>", "|", "|", "</p>"],
		[
			TemplateExpr::Raw("<b>raw</b>".into()),
			TemplateExpr::Null,
			TemplateExpr::Node(h("i", Props::new(), vec!["a&b".into()])),
		],
	);
	assert_eq!(render(&node), "<p><b>raw</b>||<i>a&amp;b</i></p>");
}

#[rstest]
fn test_render_to_markup_coalesces_text() {
	let node = Node::list([Node::from("a"), Node::from("b")]);
	let markup = SyncRenderer::new()
		.render_to_markup(&node, &ContextScope::new())
		.unwrap();

	assert_eq!(markup, Markup::Text("ab".into()));
}

#[rstest]
fn test_host_chunks_branch_the_output() {
	let spliced = || {
		Node::raw_template(
			["<section>", "</section>"],
			[TemplateExpr::Markup(Markup::Chunks(vec![
				"<p>1</p>".into(),
				"<p>2</p>".into(),
			]))],
		)
	};
	let flat = Node::list([Node::from("a"), spliced(), Node::from("b"), Node::from("c")]);
	let nested = Node::list([
		Node::list([Node::from("a"), Node::list([spliced()])]),
		Node::fragment([Node::from("b"), Node::from("c")]),
	]);
	let renderer = SyncRenderer::new();

	let markup = renderer.render_to_markup(&flat, &ContextScope::new()).unwrap();
	assert_eq!(
		markup,
		Markup::Chunks(vec!["a<section><p>1</p>".into(), "<p>2</p></section>bc".into()])
	);
	assert_eq!(
		renderer.render_to_markup(&nested, &ContextScope::new()).unwrap(),
		markup
	);
	assert_eq!(
		renderer.render_to_string(&flat).unwrap(),
		"a<section><p>1</p><p>2</p></section>bc"
	);
}

#[rstest]
fn test_element_joins_host_chunks() {
	let node = h(
		"div",
		Props::new(),
		vec![Node::raw_template(
			["", ""],
			[TemplateExpr::from(Markup::Chunks(vec!["x".into(), "y".into()]))],
		)],
	);
	let markup = SyncRenderer::new()
		.render_to_markup(&node, &ContextScope::new())
		.unwrap();

	assert_eq!(markup, Markup::Text("<div>xy</div>".into()));
}

// ============================================================================
// Category 3: Function components
// ============================================================================

#[rstest]
fn test_render_time_state_updates_settle() {
	let counter = FunctionComponent::new("Counter", |_props, cx| {
		let (count, set_count) = cx.use_state(0)?;
		if count < 3 {
			set_count.set(count + 1);
		}
		Ok(h("span", Props::new(), vec![Node::from(count)]))
	});

	assert_eq!(render(&h(counter, Props::new(), vec![])), "<span>3</span>");
}

#[rstest]
fn test_unsettled_component_hits_retry_ceiling() {
	let invocations = Rc::new(RefCell::new(0));
	let seen = Rc::clone(&invocations);
	let runaway = FunctionComponent::new("Runaway", move |_props, cx| {
		*seen.borrow_mut() += 1;
		let (count, set_count) = cx.use_state(0_i64)?;
		set_count.set(count + 1);
		Ok(Node::Null)
	});

	let err = SyncRenderer::new()
		.render_to_string(&h(runaway, Props::new(), vec![]))
		.unwrap_err();

	assert!(matches!(
		err,
		RenderError::RenderCycleExceeded { ref component, limit }
			if component == "Runaway" && limit == MAX_RERENDER_ATTEMPTS
	));
	assert_eq!(*invocations.borrow(), MAX_RERENDER_ATTEMPTS);
}

#[rstest]
fn test_memo_identity_is_stable_across_reinvocations() {
	let pointers = Rc::new(RefCell::new(Vec::new()));
	let record = Rc::clone(&pointers);
	let component = FunctionComponent::new("Memoized", move |_props, cx| {
		let (pass, set_pass) = cx.use_state(0)?;
		let memo = cx.use_memo(|| vec![1, 2, 3], "deps")?;
		let renders = cx.use_ref(0)?;
		*renders.borrow_mut() += 1;
		record.borrow_mut().push(Rc::as_ptr(&memo) as usize);
		if pass < 2 {
			set_pass.set(pass + 1);
		}
		Ok(Node::from(*renders.borrow()))
	});

	assert_eq!(render(&h(component, Props::new(), vec![])), "3");
	let pointers = pointers.borrow();
	assert_eq!(pointers.len(), 3);
	assert!(pointers.iter().all(|p| *p == pointers[0]));
}

#[rstest]
fn test_conditional_hook_is_reported() {
	let component = FunctionComponent::new("Conditional", |_props, cx| {
		let (shown, set_shown) = cx.use_state(false)?;
		if shown {
			cx.use_ref(())?;
		}
		set_shown.set(true);
		Ok(Node::Null)
	});

	let err = SyncRenderer::new()
		.render_to_string(&h(component, Props::new(), vec![]))
		.unwrap_err();

	assert!(matches!(
		err,
		RenderError::Hook(HookError::SlotCountMismatch { expected: 1, found: 2, .. })
	));
}

#[rstest]
fn test_suspension_is_an_error() {
	let lazy = FunctionComponent::new("Lazy", |_props, _cx| Err(RenderError::suspended("Lazy")));
	let err = SyncRenderer::new()
		.render_to_string(&h("main", Props::new(), vec![h(lazy, Props::new(), vec![])]))
		.unwrap_err();

	assert!(matches!(err, RenderError::Suspended { .. }));
}

#[rstest]
fn test_default_props_fill_missing_values() {
	let greeting = FunctionComponent::new("Greeting", |props, _cx| {
		Ok(h(
			"p",
			Props::new(),
			vec![props.get_str("name").unwrap_or_default().into()],
		))
	})
	.with_default_props(Props::new().with("name", "гость"));
	let greeting = Rc::new(greeting);

	assert_eq!(render(&h(&greeting, Props::new(), vec![])), "<p>гость</p>");
	assert_eq!(
		render(&h(&greeting, Props::new().with("name", "Анна"), vec![])),
		"<p>Анна</p>"
	);
	assert_eq!(
		render(&h(&greeting, Props::new().with("name", PropValue::Undefined), vec![])),
		"<p>гость</p>"
	);
}

#[rstest]
fn test_instance_cache_keeps_state_between_calls() {
	let component = Rc::new(FunctionComponent::new("Visits", |_props, cx| {
		let visits = cx.use_ref(0)?;
		*visits.borrow_mut() += 1;
		Ok(Node::from(*visits.borrow()))
	}));
	let tree = h(
		"div",
		Props::new(),
		vec![
			h(&component, Props::new().with("key", "a"), vec![]),
			h(&component, Props::new().with("key", "b"), vec![]),
		],
	);

	let cached = SyncRenderer::with_instance_cache();
	assert_eq!(cached.render_to_string(&tree).unwrap(), "<div>11</div>");
	assert_eq!(cached.render_to_string(&tree).unwrap(), "<div>22</div>");
	assert_eq!(cached.instance_count(), 2);

	cached.clear_instances();
	assert_eq!(cached.render_to_string(&tree).unwrap(), "<div>11</div>");

	let fresh = SyncRenderer::new();
	assert_eq!(fresh.render_to_string(&tree).unwrap(), "<div>11</div>");
	assert_eq!(fresh.render_to_string(&tree).unwrap(), "<div>11</div>");
	assert_eq!(fresh.instance_count(), 0);
}

// ============================================================================
// Category 4: Class components
// ============================================================================

type Log = Rc<RefCell<Vec<&'static str>>>;

struct Boundary {
	failed: Option<String>,
	log: Option<Log>,
}

impl Boundary {
	fn note(&self, event: &'static str) {
		if let Some(log) = &self.log {
			log.borrow_mut().push(event);
		}
	}
}

impl ClassComponent for Boundary {
	fn construct(props: &Props, _context: &ContextScope) -> Self {
		let log = props.get_data::<RefCell<Vec<&'static str>>>("log");
		let boundary = Self { failed: None, log };
		boundary.note("construct");
		boundary
	}

	fn render(&mut self, props: &Props, _context: &ContextScope) -> RenderResult<Node> {
		self.note("render");
		match &self.failed {
			Some(message) => Ok(h("p", Props::new().with("className", "error"), vec![message.as_str().into()])),
			None => Ok(props.children()),
		}
	}

	fn will_mount(&mut self) {
		self.note("will_mount");
	}

	fn will_update(&mut self) {
		self.note("will_update");
	}

	fn derive_state_from_error(&mut self, error: &RenderError) -> bool {
		self.note("derive_state_from_error");
		self.failed = Some(error.to_string());
		true
	}

	fn did_catch(&mut self, _error: &RenderError) -> bool {
		self.note("did_catch");
		false
	}

	fn name() -> &'static str {
		"Boundary"
	}
}

fn broken() -> Node {
	let component = FunctionComponent::new("Broken", |_props, _cx| {
		Err(RenderError::component("Broken", "boom"))
	});
	h(component, Props::new(), vec![])
}

#[rstest]
fn test_error_boundary_recovers_subtree() {
	let log: Log = Rc::new(RefCell::new(Vec::new()));
	let node = h(
		"section",
		Props::new(),
		vec![
			h(
				ClassType::of::<Boundary>(),
				Props::new().with("log", PropValue::Data(log.clone())),
				vec![broken()],
			),
			h("footer", Props::new(), vec![]),
		],
	);

	assert_eq!(
		render(&node),
		r#"<section><p class="error">component `Broken` failed: boom</p><footer></footer></section>"#
	);
	assert_eq!(
		*log.borrow(),
		vec![
			"construct",
			"will_mount",
			"render",
			"derive_state_from_error",
			"did_catch",
			"render"
		]
	);
}

#[rstest]
fn test_disabled_boundaries_propagate() {
	let node = h(ClassType::of::<Boundary>(), Props::new(), vec![broken()]);
	let err = SyncRenderer::new()
		.error_boundaries(false)
		.render_to_string(&node)
		.unwrap_err();

	assert_eq!(err.to_string(), "component `Broken` failed: boom");
}

#[rstest]
fn test_invalid_tag_is_not_intercepted() {
	let node = h(
		ClassType::of::<Boundary>(),
		Props::new(),
		vec![h("no good", Props::new(), vec![])],
	);
	let err = SyncRenderer::new().render_to_string(&node).unwrap_err();

	assert!(matches!(err, RenderError::InvalidTagName { .. }));
}

#[rstest]
fn test_cached_class_instance_is_updated() {
	let log: Log = Rc::new(RefCell::new(Vec::new()));
	let node = h(
		ClassType::of::<Boundary>(),
		Props::new().with("log", PropValue::Data(log.clone())),
		vec!["ok".into()],
	);
	let renderer = SyncRenderer::with_instance_cache();

	assert_eq!(renderer.render_to_string(&node).unwrap(), "ok");
	assert_eq!(renderer.render_to_string(&node).unwrap(), "ok");
	assert_eq!(
		*log.borrow(),
		vec!["construct", "will_mount", "render", "will_update", "render"]
	);
}

// ============================================================================
// Category 5: Context
// ============================================================================

thread_local! {
	static THEME: Context<&'static str> = Context::new("light");
}

fn theme_label() -> Node {
	let theme = THEME.with(Context::clone);
	let label = FunctionComponent::new("ThemeLabel", move |_props, cx| {
		let value = cx.use_context(&theme);
		Ok(h("span", Props::new(), vec![(*value).into()]))
	});
	h(label, Props::new(), vec![])
}

#[rstest]
fn test_context_default_and_provider() {
	let theme = THEME.with(Context::clone);

	assert_eq!(render(&theme_label()), "<span>light</span>");
	assert_eq!(
		render(&theme.provider("dark", theme_label())),
		"<span>dark</span>"
	);
	assert_eq!(
		render(&Node::fragment([
			theme.provider("dark", theme_label()),
			theme_label(),
		])),
		"<span>dark</span><span>light</span>"
	);
}

#[rstest]
fn test_render_with_context_scope() {
	let theme = THEME.with(Context::clone);
	let scope = ContextScope::new().with(&theme, "sepia");
	let html = SyncRenderer::new()
		.render_with_context(&theme_label(), &scope)
		.unwrap();

	assert_eq!(html, "<span>sepia</span>");
}

struct DarkZone;

impl ClassComponent for DarkZone {
	fn construct(_props: &Props, _context: &ContextScope) -> Self {
		Self
	}

	fn render(&mut self, props: &Props, _context: &ContextScope) -> RenderResult<Node> {
		Ok(props.children())
	}

	fn child_context(&self) -> Vec<ProvidedContext> {
		vec![THEME.with(|theme| theme.provide("dark"))]
	}

	fn name() -> &'static str {
		"DarkZone"
	}
}

#[rstest]
fn test_class_child_context() {
	let node = h(ClassType::of::<DarkZone>(), Props::new(), vec![theme_label()]);
	assert_eq!(render(&node), "<span>dark</span>");
}

// ============================================================================
// Category 6: Determinism
// ============================================================================

#[rstest]
#[serial]
fn test_repeated_renders_are_byte_identical() {
	let rows: Vec<Node> = (0..50)
		.map(|i| {
			h(
				"tr",
				Props::new().with("key", i),
				vec![h("td", Props::new(), vec![format!("row {i} & more").into()])],
			)
		})
		.collect();
	let table = h("table", Props::new(), vec![Node::fragment([theme_label(), Node::from(rows)])]);

	let renderer = SyncRenderer::new();
	let first = renderer.render_to_string(&table).unwrap();
	let second = renderer.render_to_string(&table).unwrap();

	assert_eq!(first, second);
	assert!(first.contains("<td>row 49 &amp; more</td>"));
}
