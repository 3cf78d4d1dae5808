// tests/writer_tests.rs

use sml::{
    parse_str, write_document, write_native, write_xml, Result, Tag, WriterContext,
    WriterProcessor, XmlProcessor,
};
use std::io::Write;

const HTML: &str = "{html
{head {title A test document}}
{body
  {h1:title A test document}
  {p:intro:preface This is a {em simple} sentence.}
  {ul
    {li:1 It should be nice.}
    {li:2 It should be error free.}
  }
  {!
for i in 0..42 {
    println!(\"{i}\");
}
  !}
}}";

/// Renders list items with emphasized text.
struct ListItemWriter;

impl WriterProcessor for ListItemWriter {
    fn open_tag(&self, _tag: &Tag, out: &mut dyn Write) -> Result<()> {
        write!(out, "<li>")?;
        Ok(())
    }

    fn close_tag(&self, _tag: &Tag, out: &mut dyn Write) -> Result<()> {
        write!(out, "</li>")?;
        Ok(())
    }

    fn text(&self, text: &str, out: &mut dyn Write) -> Result<()> {
        write!(out, "<em>{}</em>", text.trim())?;
        Ok(())
    }

    fn raw(&self, raw: &str, out: &mut dyn Write) -> Result<()> {
        write!(out, "{raw}")?;
        Ok(())
    }

    fn comment(&self, _comment: &str, _out: &mut dyn Write) -> Result<()> {
        Ok(())
    }
}

fn render_xml(pretty: bool) -> String {
    let root = parse_str(HTML).unwrap();
    let mut ctx = WriterContext::new(XmlProcessor::new("pre"), Vec::new(), pretty, "    ");
    ctx.register("li", ListItemWriter).unwrap();
    write_document(&root, &mut ctx).unwrap();
    String::from_utf8(ctx.into_inner()).unwrap()
}

#[test]
fn test_xml_conversion_with_list_item_writer() {
    let xml = render_xml(true);
    assert!(xml.starts_with("<html>\n"));
    assert!(xml.contains("<h1 id=\"title\">\n"));
    assert!(xml.contains("<p id=\"intro\" class=\"preface\">\n"));
    assert!(xml.contains("<li>\n"));
    assert!(xml.contains("<em>It should be nice.</em>\n"));
    assert!(xml.contains("<pre>\nfor i in 0..42 {\n"));
    assert!(!xml.contains("<li id="));
    assert!(xml.ends_with("</html>\n"));
}

#[test]
fn test_override_ends_with_its_tag() {
    let xml = render_xml(false);
    let after_list = xml.split("</ul>").nth(1).unwrap();
    assert!(after_list.contains("<pre>"));
    assert!(!after_list.contains("<em>"));
}

#[test]
fn test_native_rewrite_is_parseable() {
    let root = parse_str(HTML).unwrap();
    for pretty in [false, true] {
        let text = write_native(&root, pretty, "  ").unwrap();
        let again = parse_str(&text).unwrap();
        assert_eq!(again.tag, root.tag);
        assert_eq!(
            write_native(&again, false, "").unwrap().split_whitespace().collect::<Vec<_>>(),
            write_native(&root, false, "").unwrap().split_whitespace().collect::<Vec<_>>(),
        );
    }
}

#[test]
fn test_pretty_native_layout() {
    let root = parse_str("{doc {p hello} {! a{b} !} {# c #}}").unwrap();
    let text = write_native(&root, true, "  ").unwrap();
    assert_eq!(text, "{doc\n  {p\n    hello\n  }\n   \n  {! a{b} !}\n   \n  {# c #}\n}\n");
}

#[test]
fn test_xml_escapes_text() {
    let root = parse_str("{p a < b & \"c\"}").unwrap();
    let xml = write_xml(&root, "pre", false, "").unwrap();
    assert_eq!(xml, " <p> a &lt; b &amp; &#34;c&#34;</p>");
}
