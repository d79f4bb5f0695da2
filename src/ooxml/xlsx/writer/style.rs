//! Style descriptors and the per-workbook style registry.
//!
//! A [`Style`] is frozen once built. The registry keeps every built style in
//! creation order and hands out a [`StyleId`] for it; two styles with the same
//! attributes built separately are separate entries. Cells refer to styles by
//! id only, so a cell never owns or mutates style state.

use crate::common::{Error, Result};
use crate::ooxml::xlsx::format::{
    ArgbColor, BorderDesc, BorderEdge, DiagonalDirection, FillDesc, FontDesc, FontUnderline,
    HorizontalAlignment, LineStyle, NumberFormat, Pattern, ReadingOrder, VerticalAlignment,
};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to a style registered in a workbook.
///
/// Only meaningful for the workbook that created it; cells carrying an id
/// from another workbook render with the default style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleId {
    registry: u64,
    index: u32,
}

impl StyleId {
    /// Position of the style in its registry, in creation order.
    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub(crate) fn registry(&self) -> u64 {
        self.registry
    }
}

/// An immutable set of formatting attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    number_format: Option<NumberFormat>,
    font: Option<FontDesc>,
    fill: Option<FillDesc>,
    border: Option<BorderDesc>,
    rotation: Option<i16>,
    reading_order: Option<ReadingOrder>,
    horizontal: Option<HorizontalAlignment>,
    vertical: Option<VerticalAlignment>,
}

impl Style {
    pub fn number_format(&self) -> Option<&NumberFormat> {
        self.number_format.as_ref()
    }

    pub fn font(&self) -> Option<&FontDesc> {
        self.font.as_ref()
    }

    pub fn fill(&self) -> Option<&FillDesc> {
        self.fill.as_ref()
    }

    pub fn border(&self) -> Option<&BorderDesc> {
        self.border.as_ref()
    }

    /// Text rotation in degrees as given to the builder.
    pub fn rotation(&self) -> Option<i16> {
        self.rotation
    }

    pub fn reading_order(&self) -> Option<ReadingOrder> {
        self.reading_order
    }

    pub fn horizontal_alignment(&self) -> Option<HorizontalAlignment> {
        self.horizontal
    }

    pub fn vertical_alignment(&self) -> Option<VerticalAlignment> {
        self.vertical
    }

    pub(crate) fn has_alignment(&self) -> bool {
        self.rotation.is_some()
            || self.reading_order.is_some()
            || self.horizontal.is_some()
            || self.vertical.is_some()
    }
}

/// Append-only list of the styles defined in one workbook.
#[derive(Debug)]
pub struct StyleRegistry {
    id: u64,
    styles: Vec<Style>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            styles: Vec::new(),
        }
    }

    /// Start defining a new style.
    pub fn define(&mut self) -> StyleBuilder<'_> {
        StyleBuilder {
            registry: self,
            style: Style::default(),
        }
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Look up a style; `None` for ids issued by another registry.
    pub fn get(&self, id: StyleId) -> Option<&Style> {
        if id.registry != self.id {
            return None;
        }
        self.styles.get(id.index())
    }

    /// Styles with their ids, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (StyleId, &Style)> + '_ {
        let registry = self.id;
        self.styles.iter().enumerate().map(move |(i, style)| {
            (
                StyleId {
                    registry,
                    index: i as u32,
                },
                style,
            )
        })
    }

    fn push(&mut self, style: Style) -> StyleId {
        let id = StyleId {
            registry: self.id,
            index: self.styles.len() as u32,
        };
        log::trace!("registered style #{} in registry {}", id.index, self.id);
        self.styles.push(style);
        id
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Fluent builder for a [`Style`].
///
/// Argument checks happen in the setters; [`build`](Self::build) cannot fail.
/// Building twice registers two distinct styles with the same attributes.
#[derive(Debug)]
pub struct StyleBuilder<'a> {
    registry: &'a mut StyleRegistry,
    style: Style,
}

impl<'a> StyleBuilder<'a> {
    /// Use a custom number format code such as `"0.00"`.
    pub fn number_format(mut self, code: impl Into<String>) -> Self {
        self.style.number_format = Some(NumberFormat::Custom(code.into()));
        self
    }

    /// Use a built-in number format.
    ///
    /// Accepted indices are `0..=0x16` and `0x25..=0x31`.
    pub fn builtin_number_format(mut self, index: u16) -> Result<Self> {
        if !NumberFormat::is_valid_builtin(index) {
            return Err(Error::invalid_argument(format!(
                "builtin number format index must be within 0x0-0x16 or 0x25-0x31, got {:#x}",
                index
            )));
        }
        self.style.number_format = Some(NumberFormat::Builtin(index));
        Ok(self)
    }

    pub fn bg_color(mut self, color: impl Into<ArgbColor>) -> Self {
        self.fill_mut().background = Some(color.into());
        self
    }

    pub fn fg_color(mut self, color: impl Into<ArgbColor>) -> Self {
        self.fill_mut().foreground = Some(color.into());
        self
    }

    /// Fill pattern; defaults to solid when only colors are given.
    pub fn pattern(mut self, pattern: Pattern) -> Self {
        self.fill_mut().pattern = Some(pattern);
        self
    }

    /// Text rotation in degrees: `-90..=90`, or `270` for stacked text.
    pub fn rotation(mut self, degrees: i16) -> Result<Self> {
        if !((-90..=90).contains(&degrees) || degrees == 270) {
            return Err(Error::invalid_argument(format!(
                "rotation must be within -90..=90 or 270, got {}",
                degrees
            )));
        }
        self.style.rotation = Some(degrees);
        Ok(self)
    }

    pub fn reading_order(mut self, order: ReadingOrder) -> Self {
        self.style.reading_order = Some(order);
        self
    }

    pub fn horizontal_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.style.horizontal = Some(alignment);
        self
    }

    pub fn vertical_alignment(mut self, alignment: VerticalAlignment) -> Self {
        self.style.vertical = Some(alignment);
        self
    }

    /// Draw a diagonal line in the given direction.
    pub fn diagonal(mut self, direction: DiagonalDirection) -> Self {
        self.border_mut().diagonal_direction = Some(direction);
        self
    }

    pub fn diagonal_color(mut self, color: impl Into<ArgbColor>) -> Self {
        self.border_mut().diagonal.color = Some(color.into());
        self
    }

    /// Line style of the diagonal; thin when unset.
    pub fn diagonal_line_style(mut self, style: LineStyle) -> Self {
        self.border_mut().diagonal.style = Some(style);
        self
    }

    /// Configure the font; return with [`FontBuilder::and`].
    pub fn font(mut self) -> FontBuilder<'a> {
        let font = self.style.font.take().unwrap_or_default();
        FontBuilder { parent: self, font }
    }

    /// Configure the outer borders; return with [`BorderBuilder::and`].
    pub fn border(mut self) -> BorderBuilder<'a> {
        let border = self.style.border.take().unwrap_or_default();
        BorderBuilder {
            parent: self,
            border,
        }
    }

    /// Freeze the current attributes into a new registered style.
    pub fn build(&mut self) -> StyleId {
        self.registry.push(self.style.clone())
    }

    fn fill_mut(&mut self) -> &mut FillDesc {
        self.style.fill.get_or_insert_with(FillDesc::default)
    }

    fn border_mut(&mut self) -> &mut BorderDesc {
        self.style.border.get_or_insert_with(BorderDesc::default)
    }
}

/// Font section of a [`StyleBuilder`].
#[derive(Debug)]
pub struct FontBuilder<'a> {
    parent: StyleBuilder<'a>,
    font: FontDesc,
}

impl<'a> FontBuilder<'a> {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.font.name = name.into();
        self
    }

    /// Size in points.
    pub fn size(mut self, size: f64) -> Self {
        self.font.size = size;
        self
    }

    pub fn color(mut self, color: impl Into<ArgbColor>) -> Self {
        self.font.color = Some(color.into());
        self
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.font.bold = bold;
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.font.italic = italic;
        self
    }

    pub fn underline(mut self, underline: FontUnderline) -> Self {
        self.font.underline = underline;
        self
    }

    pub fn strike_out(mut self, strike_out: bool) -> Self {
        self.font.strike_out = strike_out;
        self
    }

    /// Back to the style builder.
    pub fn and(mut self) -> StyleBuilder<'a> {
        self.parent.style.font = Some(self.font);
        self.parent
    }

    pub fn build(self) -> StyleId {
        self.and().build()
    }
}

/// Border section of a [`StyleBuilder`].
#[derive(Debug)]
pub struct BorderBuilder<'a> {
    parent: StyleBuilder<'a>,
    border: BorderDesc,
}

impl<'a> BorderBuilder<'a> {
    /// Line style for every edge without its own.
    pub fn style(mut self, style: LineStyle) -> Self {
        self.border.style = Some(style);
        self
    }

    /// Color for every edge without its own.
    pub fn color(mut self, color: impl Into<ArgbColor>) -> Self {
        self.border.color = Some(color.into());
        self
    }

    pub fn edge_style(mut self, edge: BorderEdge, style: LineStyle) -> Self {
        self.border.edge_mut(edge).style = Some(style);
        self
    }

    pub fn edge_color(mut self, edge: BorderEdge, color: impl Into<ArgbColor>) -> Self {
        self.border.edge_mut(edge).color = Some(color.into());
        self
    }

    /// Back to the style builder.
    pub fn and(mut self) -> StyleBuilder<'a> {
        self.parent.style.border = if self.border.is_set() {
            Some(self.border)
        } else {
            None
        };
        self.parent
    }

    pub fn build(self) -> StyleId {
        self.and().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::xlsx::format::Color;

    #[test]
    fn test_identical_styles_are_distinct() {
        let mut registry = StyleRegistry::new();
        let a = registry.define().font().bold(true).and().build();
        let b = registry.define().font().bold(true).and().build();
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(a), registry.get(b));
    }

    #[test]
    fn test_build_twice_appends_twice() {
        let mut registry = StyleRegistry::new();
        let mut builder = registry.define().number_format("0.00");
        let first = builder.build();
        let second = builder.build();
        assert_eq!(first.index(), 0);
        assert_eq!(second.index(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_builtin_number_format_range() {
        let mut registry = StyleRegistry::new();
        assert!(registry.define().builtin_number_format(0x0e).is_ok());
        assert!(registry.define().builtin_number_format(0x31).is_ok());
        let err = registry.define().builtin_number_format(0x20).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_rotation_range() {
        let mut registry = StyleRegistry::new();
        assert!(registry.define().rotation(-90).is_ok());
        assert!(registry.define().rotation(90).is_ok());
        assert!(registry.define().rotation(270).is_ok());
        assert!(matches!(
            registry.define().rotation(91),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            registry.define().rotation(-91),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_font_section_returns_to_parent() -> Result<()> {
        let mut registry = StyleRegistry::new();
        let id = registry
            .define()
            .font()
            .name("Arial")
            .size(14.0)
            .italic(true)
            .color(Color::Red)
            .and()
            .rotation(45)?
            .build();

        let style = registry.get(id).unwrap();
        let font = style.font().unwrap();
        assert_eq!(font.name, "Arial");
        assert_eq!(font.size, 14.0);
        assert!(font.italic && !font.bold);
        assert_eq!(font.color.as_ref().unwrap().as_str(), "FFFF0000");
        assert_eq!(style.rotation(), Some(45));
        Ok(())
    }

    #[test]
    fn test_border_section_and_diagonal() {
        let mut registry = StyleRegistry::new();
        let id = registry
            .define()
            .diagonal_color(Color::Red)
            .diagonal(DiagonalDirection::Both)
            .border()
            .color(Color::Lime)
            .style(LineStyle::Medium)
            .edge_color(BorderEdge::Bottom, Color::Blue)
            .edge_style(BorderEdge::Bottom, LineStyle::DashDotDot)
            .build();

        let border = registry.get(id).unwrap().border().unwrap();
        assert_eq!(border.style, Some(LineStyle::Medium));
        assert_eq!(border.diagonal_direction, Some(DiagonalDirection::Both));
        assert_eq!(border.diagonal.color, Some(ArgbColor::from(Color::Red)));
        assert_eq!(border.edge(BorderEdge::Bottom).style, Some(LineStyle::DashDotDot));
        assert_eq!(border.edge(BorderEdge::Left).style, None);
    }

    #[test]
    fn test_empty_border_section_is_dropped() {
        let mut registry = StyleRegistry::new();
        let id = registry.define().border().and().build();
        assert!(registry.get(id).unwrap().border().is_none());
    }

    #[test]
    fn test_foreign_ids_do_not_resolve() {
        let mut one = StyleRegistry::new();
        let other = StyleRegistry::new();
        let id = one.define().build();
        assert!(one.get(id).is_some());
        assert!(other.get(id).is_none());
    }
}
