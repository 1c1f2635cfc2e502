//! Module Rendering
//!
//! The same renderer draws a module in place and inside the drag overlay,
//! so the lifted copy always matches the real one.

use std::fmt::Write;

use crate::modules::{Cta, DividerStyle, HeadingSize, ImageBlock, ImageRef, Module, ModuleContent};

pub trait ModuleRenderer {
    type Output;

    /// `None` renders nothing (unknown module types).
    fn render(&self, module: &Module) -> Option<Self::Output>;
}

/// Reference renderer producing HTML fragments.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupRenderer;

impl ModuleRenderer for MarkupRenderer {
    type Output = String;

    fn render(&self, module: &Module) -> Option<String> {
        let kind = module.kind()?;
        let mut html = String::new();
        let _ = write!(html, r#"<section class="module module--{}" data-id="{}">"#, kind, escape(&module.id));
        match &module.content {
            ModuleContent::LogoChip { logo, label } => {
                push_image(&mut html, logo, label.as_deref().unwrap_or("logo"));
            }
            ModuleContent::Header { heading, heading_size, subheader, cta } => {
                let tag = match heading_size {
                    HeadingSize::Large => "h1",
                    HeadingSize::Medium => "h2",
                    HeadingSize::Small => "h3",
                };
                let _ = write!(html, "<{tag}>{}</{tag}>", escape(heading));
                push_opt(&mut html, "p", subheader.as_deref());
                push_cta(&mut html, cta.as_ref());
            }
            ModuleContent::Paragraph { heading, body } => {
                push_opt(&mut html, "h3", heading.as_deref());
                push_opt(&mut html, "p", Some(body));
            }
            ModuleContent::ThreeBullets { heading, bullets } => {
                push_opt(&mut html, "h3", heading.as_deref());
                html.push_str("<ul>");
                for bullet in bullets {
                    push_opt(&mut html, "li", Some(bullet));
                }
                html.push_str("</ul>");
            }
            ModuleContent::ImageSquare(block) | ModuleContent::ImageWide(block) => {
                push_image_block(&mut html, block);
            }
            ModuleContent::Divider { style } => match style {
                DividerStyle::Line => html.push_str("<hr>"),
                DividerStyle::Space => html.push_str(r#"<div class="spacer"></div>"#),
            },
            ModuleContent::SimpleCards { cards } => {
                for card in cards {
                    html.push_str(r#"<div class="card">"#);
                    push_opt(&mut html, "h4", Some(&card.title));
                    push_opt(&mut html, "p", Some(&card.body));
                    html.push_str("</div>");
                }
            }
            ModuleContent::ImageCards { cards } => {
                for card in cards {
                    html.push_str(r#"<div class="card">"#);
                    push_image(&mut html, &card.image, &card.title);
                    push_opt(&mut html, "h4", Some(&card.title));
                    push_opt(&mut html, "p", Some(&card.body));
                    html.push_str("</div>");
                }
            }
            ModuleContent::Quote { quote, attribution } => {
                push_opt(&mut html, "blockquote", Some(quote));
                push_opt(&mut html, "cite", attribution.as_deref());
            }
            ModuleContent::ThreeStats { stats } => {
                for stat in stats {
                    let _ = write!(
                        html,
                        r#"<div class="stat"><strong>{}</strong><span>{}</span></div>"#,
                        escape(&stat.value),
                        escape(&stat.label)
                    );
                }
            }
            ModuleContent::OneStat { stat, body } => {
                let _ = write!(
                    html,
                    r#"<div class="stat"><strong>{}</strong><span>{}</span></div>"#,
                    escape(&stat.value),
                    escape(&stat.label)
                );
                push_opt(&mut html, "p", body.as_deref());
            }
            ModuleContent::Footer { text, legal } => {
                push_opt(&mut html, "p", Some(text));
                push_opt(&mut html, "small", legal.as_deref());
            }
            ModuleContent::Unknown { .. } => return None,
        }
        html.push_str("</section>");
        Some(html)
    }
}

fn push_opt<S: AsRef<str>>(html: &mut String, tag: &str, text: Option<S>) {
    let Some(text) = text else { return };
    let text = text.as_ref();
    if !text.is_empty() {
        let _ = write!(html, "<{tag}>{}</{tag}>", escape(text));
    }
}

fn push_cta(html: &mut String, cta: Option<&Cta>) {
    if let Some(cta) = cta {
        let _ = write!(html, r#"<a class="cta" href="{}">{}</a>"#, escape(&cta.url), escape(&cta.label));
    }
}

fn push_image(html: &mut String, image: &ImageRef, alt: &str) {
    let filter = if image.grayscale { "filter:grayscale(1);" } else { "" };
    let _ = write!(
        html,
        r#"<img src="{}" alt="{}" style="object-position:{}% {}%;transform:scale({});{}">"#,
        escape(&image.src),
        escape(alt),
        image.pan_x,
        image.pan_y,
        image.zoom,
        filter
    );
}

fn push_image_block(html: &mut String, block: &ImageBlock) {
    push_image(html, &block.image, block.heading.as_deref().unwrap_or(""));
    push_opt(html, "span", block.eyebrow.as_deref());
    push_opt(html, "h3", block.heading.as_deref());
    push_opt(html, "p", block.body.as_deref());
    push_cta(html, block.cta.as_ref());
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
