//! Layout objects
//!
//! A [`Layout`] is an ordered tree of [`LayoutObject`]s: field references and
//! the containers that group them. Rendering walks the tree in order, feeding
//! field references through the field resolver and wrapping container
//! children in their markup. After the declared nodes, the root layout
//! appends every form field the tree did not mention.
//!
//! ```
//! use uniform_layout::{Fieldset, HTML, Layout, LayoutItem, Row};
//!
//! let layout = Layout::new([
//!     LayoutItem::from(Fieldset::new("", ["is_company"]).unwrap()),
//!     Fieldset::new(
//!         "Contact details",
//!         [
//!             LayoutItem::from("email"),
//!             Row::new(["password1", "password2"]).unwrap().into(),
//!             "first_name".into(),
//!             "last_name".into(),
//!             HTML::new(r#"<img src="/media/somepicture.jpg"/>"#).into(),
//!         ],
//!     )
//!     .unwrap()
//!     .into(),
//! ])
//! .unwrap();
//!
//! assert_eq!(layout.fields().len(), 2);
//! ```

use crate::error::UniFormResult;
use crate::field::{
	FormContext, RenderContext, RenderPass, render_field, render_field_with, render_remaining_fields,
};
use crate::field_name::FieldName;
use uniform_forms::Form;
use uniform_templates::{Context, escape_html};

/// Any node of a layout tree
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutObject {
	Field(FieldName),
	Fieldset(Fieldset),
	Row(Row),
	Column(Column),
	MultiField(MultiField),
	Html(HTML),
	Layout(Layout),
}

impl LayoutObject {
	pub fn render(
		&self,
		form: &Form,
		pass: &mut RenderPass,
		ctx: &RenderContext<'_>,
	) -> UniFormResult<String> {
		match self {
			LayoutObject::Field(name) => render_field(name, form, pass, ctx),
			LayoutObject::Fieldset(fieldset) => fieldset.render(form, pass, ctx),
			LayoutObject::Row(row) => row.render(form, pass, ctx),
			LayoutObject::Column(column) => column.render(form, pass, ctx),
			LayoutObject::MultiField(multi_field) => multi_field.render(form, pass, ctx),
			LayoutObject::Html(html) => html.render(form, ctx),
			LayoutObject::Layout(layout) => render_children(&layout.fields, form, pass, ctx),
		}
	}

	/// The referenced field name for field nodes
	pub fn field_name(&self) -> Option<&FieldName> {
		match self {
			LayoutObject::Field(name) => Some(name),
			_ => None,
		}
	}

	/// Children of container nodes
	pub fn fields(&self) -> Option<&[LayoutObject]> {
		match self {
			LayoutObject::Fieldset(c) => Some(&c.fields),
			LayoutObject::Row(c) => Some(&c.fields),
			LayoutObject::Column(c) => Some(&c.fields),
			LayoutObject::MultiField(c) => Some(&c.fields),
			LayoutObject::Layout(c) => Some(&c.fields),
			LayoutObject::Field(_) | LayoutObject::Html(_) => None,
		}
	}

	pub fn fields_mut(&mut self) -> Option<&mut Vec<LayoutObject>> {
		match self {
			LayoutObject::Fieldset(c) => Some(&mut c.fields),
			LayoutObject::Row(c) => Some(&mut c.fields),
			LayoutObject::Column(c) => Some(&mut c.fields),
			LayoutObject::MultiField(c) => Some(&mut c.fields),
			LayoutObject::Layout(c) => Some(&mut c.fields),
			LayoutObject::Field(_) | LayoutObject::Html(_) => None,
		}
	}
}

/// Argument accepted wherever a layout child is expected
///
/// Plain strings are field references and are validated when the container
/// is built.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutItem {
	Name(String),
	Node(LayoutObject),
}

impl LayoutItem {
	pub fn into_object(self) -> UniFormResult<LayoutObject> {
		match self {
			LayoutItem::Name(name) => Ok(LayoutObject::Field(FieldName::new(name)?)),
			LayoutItem::Node(node) => Ok(node),
		}
	}
}

impl From<&str> for LayoutItem {
	fn from(name: &str) -> Self {
		LayoutItem::Name(name.to_string())
	}
}

impl From<String> for LayoutItem {
	fn from(name: String) -> Self {
		LayoutItem::Name(name)
	}
}

impl From<FieldName> for LayoutItem {
	fn from(name: FieldName) -> Self {
		LayoutItem::Node(LayoutObject::Field(name))
	}
}

impl From<LayoutObject> for LayoutItem {
	fn from(node: LayoutObject) -> Self {
		LayoutItem::Node(node)
	}
}

macro_rules! impl_node_conversions {
	($($ty:ident => $variant:ident),* $(,)?) => {
		$(
			impl From<$ty> for LayoutObject {
				fn from(node: $ty) -> Self {
					LayoutObject::$variant(node)
				}
			}

			impl From<$ty> for LayoutItem {
				fn from(node: $ty) -> Self {
					LayoutItem::Node(LayoutObject::$variant(node))
				}
			}
		)*
	};
}

impl_node_conversions!(
	Fieldset => Fieldset,
	Row => Row,
	Column => Column,
	MultiField => MultiField,
	HTML => Html,
	Layout => Layout,
);

fn collect_children<I, T>(items: I) -> UniFormResult<Vec<LayoutObject>>
where
	I: IntoIterator<Item = T>,
	T: Into<LayoutItem>,
{
	items
		.into_iter()
		.map(|item| item.into().into_object())
		.collect()
}

fn render_children(
	children: &[LayoutObject],
	form: &Form,
	pass: &mut RenderPass,
	ctx: &RenderContext<'_>,
) -> UniFormResult<String> {
	let mut html = String::new();
	for child in children {
		html.push_str(&child.render(form, pass, ctx)?);
	}
	Ok(html)
}

fn push_attr(html: &mut String, attr: &str, value: &str) {
	html.push(' ');
	html.push_str(attr);
	html.push_str("=\"");
	html.push_str(&escape_html(value));
	html.push('"');
}

fn non_empty(value: String) -> Option<String> {
	let value = value.trim().to_string();
	(!value.is_empty()).then_some(value)
}

/// Shared child-list operations of container nodes
pub trait Container {
	fn fields(&self) -> &[LayoutObject];

	fn fields_mut(&mut self) -> &mut Vec<LayoutObject>;

	/// Append a child, validating plain names
	fn push(&mut self, item: impl Into<LayoutItem>) -> UniFormResult<()> {
		let node = item.into().into_object()?;
		self.fields_mut().push(node);
		Ok(())
	}

	/// Remove the first direct child referencing `name`
	fn remove_field(&mut self, name: &str) -> Option<LayoutObject> {
		let fields = self.fields_mut();
		let index = fields
			.iter()
			.position(|node| node.field_name().is_some_and(|n| n == name))?;
		Some(fields.remove(index))
	}
}

macro_rules! impl_container {
	($($ty:ty),*) => {
		$(
			impl Container for $ty {
				fn fields(&self) -> &[LayoutObject] {
					&self.fields
				}

				fn fields_mut(&mut self) -> &mut Vec<LayoutObject> {
					&mut self.fields
				}
			}
		)*
	};
}

impl_container!(Layout, Fieldset, Row, Column, MultiField);

/// Root of a form layout
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
	fields: Vec<LayoutObject>,
}

impl Layout {
	pub fn new<I, T>(fields: I) -> UniFormResult<Self>
	where
		I: IntoIterator<Item = T>,
		T: Into<LayoutItem>,
	{
		Ok(Self {
			fields: collect_children(fields)?,
		})
	}

	pub fn fields(&self) -> &[LayoutObject] {
		&self.fields
	}

	pub fn fields_mut(&mut self) -> &mut Vec<LayoutObject> {
		&mut self.fields
	}

	/// Render the layout against a form in a fresh pass
	pub fn render(&self, form: &Form, ctx: &RenderContext<'_>) -> UniFormResult<String> {
		let mut pass = RenderPass::new();
		self.render_with_pass(form, &mut pass, ctx)
	}

	/// Render the declared nodes, then every field the pass has not seen
	pub fn render_with_pass(
		&self,
		form: &Form,
		pass: &mut RenderPass,
		ctx: &RenderContext<'_>,
	) -> UniFormResult<String> {
		let mut html = render_children(&self.fields, form, pass, ctx)?;
		html.push_str(&render_remaining_fields(form, pass, ctx)?);
		Ok(html)
	}
}

/// Renders to a `<fieldset>` with an optional legend
#[derive(Debug, Clone, PartialEq)]
pub struct Fieldset {
	legend: String,
	fields: Vec<LayoutObject>,
	css_class: Option<String>,
	css_id: Option<String>,
}

impl Fieldset {
	pub fn new<I, T>(legend: impl Into<String>, fields: I) -> UniFormResult<Self>
	where
		I: IntoIterator<Item = T>,
		T: Into<LayoutItem>,
	{
		Ok(Self {
			legend: legend.into(),
			fields: collect_children(fields)?,
			css_class: None,
			css_id: None,
		})
	}

	pub fn with_css_class(mut self, css_class: impl Into<String>) -> Self {
		self.css_class = non_empty(css_class.into());
		self
	}

	pub fn with_css_id(mut self, css_id: impl Into<String>) -> Self {
		self.css_id = non_empty(css_id.into());
		self
	}

	pub fn legend(&self) -> &str {
		&self.legend
	}

	pub fn css_class(&self) -> Option<&str> {
		self.css_class.as_deref()
	}

	pub fn css_id(&self) -> Option<&str> {
		self.css_id.as_deref()
	}

	pub fn render(
		&self,
		form: &Form,
		pass: &mut RenderPass,
		ctx: &RenderContext<'_>,
	) -> UniFormResult<String> {
		let mut html = String::from("<fieldset");
		if let Some(id) = &self.css_id {
			push_attr(&mut html, "id", id);
		}
		let class = [self.css_class.as_deref().unwrap_or(""), ctx.form_style]
			.iter()
			.filter(|part| !part.is_empty())
			.copied()
			.collect::<Vec<_>>()
			.join(" ");
		if !class.is_empty() {
			push_attr(&mut html, "class", &class);
		}
		html.push('>');

		if !self.legend.is_empty() {
			html.push_str("<legend>");
			html.push_str(&escape_html(&self.legend));
			html.push_str("</legend>");
		}
		html.push_str(&render_children(&self.fields, form, pass, ctx)?);
		html.push_str("</fieldset>");
		Ok(html)
	}
}

const ROW_CLASS: &str = "formRow";
const COLUMN_CLASS: &str = "formColumn";

fn render_div(
	css_id: Option<&str>,
	css_class: &str,
	children: &[LayoutObject],
	form: &Form,
	pass: &mut RenderPass,
	ctx: &RenderContext<'_>,
) -> UniFormResult<String> {
	let mut html = String::from("<div");
	if let Some(id) = css_id {
		push_attr(&mut html, "id", id);
	}
	if !css_class.is_empty() {
		push_attr(&mut html, "class", css_class);
	}
	html.push('>');
	html.push_str(&render_children(children, form, pass, ctx)?);
	html.push_str("</div>");
	Ok(html)
}

/// Renders its children side by side inside a `formRow` div
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
	fields: Vec<LayoutObject>,
	css_class: String,
	css_id: Option<String>,
}

impl Row {
	pub fn new<I, T>(fields: I) -> UniFormResult<Self>
	where
		I: IntoIterator<Item = T>,
		T: Into<LayoutItem>,
	{
		Ok(Self {
			fields: collect_children(fields)?,
			css_class: ROW_CLASS.to_string(),
			css_id: None,
		})
	}

	/// Replace the default `formRow` class
	pub fn with_css_class(mut self, css_class: impl Into<String>) -> Self {
		self.css_class = css_class.into().trim().to_string();
		self
	}

	pub fn with_css_id(mut self, css_id: impl Into<String>) -> Self {
		self.css_id = non_empty(css_id.into());
		self
	}

	pub fn css_class(&self) -> &str {
		&self.css_class
	}

	pub fn css_id(&self) -> Option<&str> {
		self.css_id.as_deref()
	}

	pub fn render(
		&self,
		form: &Form,
		pass: &mut RenderPass,
		ctx: &RenderContext<'_>,
	) -> UniFormResult<String> {
		render_div(
			self.css_id.as_deref(),
			&self.css_class,
			&self.fields,
			form,
			pass,
			ctx,
		)
	}
}

/// Renders its children stacked inside a `formColumn` div
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
	fields: Vec<LayoutObject>,
	css_class: String,
	css_id: Option<String>,
}

impl Column {
	pub fn new<I, T>(fields: I) -> UniFormResult<Self>
	where
		I: IntoIterator<Item = T>,
		T: Into<LayoutItem>,
	{
		Ok(Self {
			fields: collect_children(fields)?,
			css_class: COLUMN_CLASS.to_string(),
			css_id: None,
		})
	}

	/// Replace the default `formColumn` class
	pub fn with_css_class(mut self, css_class: impl Into<String>) -> Self {
		self.css_class = css_class.into().trim().to_string();
		self
	}

	pub fn with_css_id(mut self, css_id: impl Into<String>) -> Self {
		self.css_id = non_empty(css_id.into());
		self
	}

	pub fn css_class(&self) -> &str {
		&self.css_class
	}

	pub fn css_id(&self) -> Option<&str> {
		self.css_id.as_deref()
	}

	pub fn render(
		&self,
		form: &Form,
		pass: &mut RenderPass,
		ctx: &RenderContext<'_>,
	) -> UniFormResult<String> {
		render_div(
			self.css_id.as_deref(),
			&self.css_class,
			&self.fields,
			form,
			pass,
			ctx,
		)
	}
}

const MULTIFIELD_CLASS: &str = "ctrlHolder";
const MULTIFIELD_LABEL_CLASS: &str = "blockLabel";

/// Several fields sharing one label, errors and hints
///
/// The fields render with the multi-field template; their errors and help
/// texts are collected above and below the group.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiField {
	label: String,
	fields: Vec<LayoutObject>,
	css_class: String,
	css_id: Option<String>,
	label_class: String,
}

impl MultiField {
	pub fn new<I, T>(label: impl Into<String>, fields: I) -> UniFormResult<Self>
	where
		I: IntoIterator<Item = T>,
		T: Into<LayoutItem>,
	{
		Ok(Self {
			label: label.into(),
			fields: collect_children(fields)?,
			css_class: MULTIFIELD_CLASS.to_string(),
			css_id: None,
			label_class: MULTIFIELD_LABEL_CLASS.to_string(),
		})
	}

	/// Replace the default `ctrlHolder` class of the outer div
	pub fn with_css_class(mut self, css_class: impl Into<String>) -> Self {
		self.css_class = css_class.into().trim().to_string();
		self
	}

	pub fn with_css_id(mut self, css_id: impl Into<String>) -> Self {
		self.css_id = non_empty(css_id.into());
		self
	}

	/// Replace the default `blockLabel` class of the field labels
	pub fn with_label_class(mut self, label_class: impl Into<String>) -> Self {
		self.label_class = label_class.into().trim().to_string();
		self
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn css_class(&self) -> &str {
		&self.css_class
	}

	pub fn css_id(&self) -> Option<&str> {
		self.css_id.as_deref()
	}

	pub fn label_class(&self) -> &str {
		&self.label_class
	}

	pub fn render(
		&self,
		form: &Form,
		pass: &mut RenderPass,
		ctx: &RenderContext<'_>,
	) -> UniFormResult<String> {
		let mut field_output = String::new();
		let mut errors = String::new();
		let mut help_text = String::new();
		let mut count = 0;

		for child in &self.fields {
			let LayoutObject::Field(name) = child else {
				field_output.push_str(&child.render(form, pass, ctx)?);
				continue;
			};

			field_output.push_str(&render_field_with(
				name,
				form,
				pass,
				ctx,
				&ctx.settings.multifield_template,
				Some(&self.label_class),
			)?);

			// Unresolved fields only get here when failing silently
			let Some(bound) = form.get_bound_field(name.as_str()) else {
				continue;
			};
			let auto_id = bound.auto_id();
			for error in bound.errors() {
				errors.push_str(&format!(
					"<p id=\"error_{}_{}\" class=\"errorField\">{}</p>",
					count,
					auto_id,
					escape_html(error)
				));
				count += 1;
			}
			if let Some(text) = bound.help_text()
				&& !text.is_empty()
			{
				help_text.push_str(&format!(
					"<p id=\"hint_{}\" class=\"formHint\">{}</p>",
					auto_id,
					escape_html(text)
				));
			}
		}

		let mut class = self.css_class.clone();
		if !errors.is_empty() {
			if !class.is_empty() {
				class.push(' ');
			}
			class.push_str("error");
		}

		let mut html = String::from("<div");
		if let Some(id) = &self.css_id {
			push_attr(&mut html, "id", id);
		}
		push_attr(&mut html, "class", &class);
		html.push_str(">\n");
		html.push_str(&errors);
		if !self.label.is_empty() {
			html.push_str(&format!(
				"<p class=\"label\">{}</p>\n",
				escape_html(&self.label)
			));
		}
		html.push_str("<div class=\"multiField\">\n");
		html.push_str(&field_output);
		html.push_str("</div>\n");
		html.push_str(&help_text);
		html.push_str("</div>\n");
		Ok(html)
	}
}

/// Raw markup inserted between fields
///
/// The markup is itself a template and can refer to the form being rendered
/// as `form`, e.g. `{{ form.fields.email.value }}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HTML {
	html: String,
}

impl HTML {
	pub fn new(html: impl Into<String>) -> Self {
		Self { html: html.into() }
	}

	pub fn html(&self) -> &str {
		&self.html
	}

	pub fn render(&self, form: &Form, ctx: &RenderContext<'_>) -> UniFormResult<String> {
		let mut context = Context::new();
		context.insert("form", &FormContext::from_form(form));
		Ok(ctx.engine.render_str(&self.html, &context)?)
	}
}
