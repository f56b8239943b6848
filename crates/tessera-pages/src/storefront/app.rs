//! The storefront page tree.

use std::rc::Rc;

use super::product::Product;
use crate::component::{FunctionComponent, Node, Props, h};
use crate::reactive::{ByPtr, Context};

const TITLE: &str = "🛍️ Магазин Enddel";
const SEARCH_PLACEHOLDER: &str = "Поиск товаров...";
const CART_SUMMARY: &str = " 0 товаров | 0 ₽";
const ADD_TO_CART: &str = "В корзину";
const LOADING: &str = "Загрузка товаров...";

fn class(name: &'static str) -> Props {
	Props::new().with("className", name)
}

/// Builds the page component. It reads the products to show from `catalogue`.
///
/// ```ignore
/// let catalogue = Context::new(Vec::new());
/// let app = Rc::new(storefront_app(catalogue.clone()));
/// let page = catalogue.provider(products, h(&app, Props::new(), vec![]));
/// ```
pub fn storefront_app(catalogue: Context<Vec<Product>>) -> FunctionComponent {
	FunctionComponent::new("StorefrontApp", move |_props, cx| {
		let products = cx.use_context(&catalogue);
		let grid = cx.use_memo(|| product_grid(&products), ByPtr(Rc::clone(&products)))?;

		Ok(h(
			"div",
			class("container"),
			vec![
				shop_header(),
				h("div", class("products-grid"), vec![(*grid).clone()]),
			],
		))
	})
}

fn shop_header() -> Node {
	let search = h(
		"div",
		class("search-container"),
		vec![
			h(
				"input",
				Props::new()
					.with("type", "text")
					.with("className", "input input-search")
					.with("placeholder", SEARCH_PLACEHOLDER)
					.with("disabled", true),
				vec![],
			),
			h("span", class("search-emoji"), vec!["🔍".into()]),
		],
	);
	let cart = h(
		"div",
		class("cart-indicator"),
		vec![h("span", Props::new(), vec!["🛒".into()]), CART_SUMMARY.into()],
	);

	h(
		"header",
		class("shop-header"),
		vec![
			h("h1", class("title"), vec![TITLE.into()]),
			h("div", class("shop-controls"), vec![search, cart]),
		],
	)
}

fn product_grid(products: &[Product]) -> Node {
	if products.is_empty() {
		return h("div", class("empty-state"), vec![LOADING.into()]);
	}
	Node::list(products.iter().map(product_card))
}

/// One product card, keyed by product id. Cards without an id keep their
/// position in the list as identity.
pub fn product_card(product: &Product) -> Node {
	let image = match product.image() {
		Some(src) => h(
			"img",
			Props::new()
				.with("src", src)
				.with("alt", product.alt_text())
				.with("loading", "lazy"),
			vec![],
		),
		None => h("div", class("product-placeholder"), vec!["📦".into()]),
	};

	let mut props = Props::new();
	if let Some(id) = &product.id {
		props = props.with("key", id.to_string());
	}

	h(
		"div",
		props.with("className", "product-card"),
		vec![
			h("div", class("product-image"), vec![image]),
			h("h3", class("product-name"), vec![product.display_name().into()]),
			h("div", class("product-price"), vec![product.price_label().into()]),
			h(
				"button",
				Props::new()
					.with("className", "btn btn-primary")
					.with("disabled", true),
				vec![ADD_TO_CART.into()],
			),
		],
	)
}
