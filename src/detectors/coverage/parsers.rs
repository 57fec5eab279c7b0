use std::fs;
use std::path::Path;
use std::str::FromStr;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::core::errors::{Result, TestforgeError};
use crate::detectors::coverage::types::{CounterKind, CoverageCounter};

const FORMAT: &str = "jacoco";

/// Parsed `<report>` element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JacocoReport {
    pub name: String,
    pub counters: Vec<CoverageCounter>,
    pub packages: Vec<PackageElement>,
}

/// Parsed `<package>` element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageElement {
    pub name: String,
    pub counters: Vec<CoverageCounter>,
    pub classes: Vec<ClassElement>,
    pub source_files: Vec<SourceFileElement>,
}

/// Parsed `<class>` element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassElement {
    /// Slash-separated class name; absent in some hand-written reports
    pub name: Option<String>,
    pub source_file_name: Option<String>,
    pub counters: Vec<CoverageCounter>,
    pub methods: Vec<MethodElement>,
}

/// Parsed `<method>` element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodElement {
    pub name: String,
    pub descriptor: String,
    pub line: u32,
    pub counters: Vec<CoverageCounter>,
    /// Line entries nested directly under the method
    pub lines: Vec<LineEntry>,
}

/// Parsed `<sourcefile>` element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceFileElement {
    pub name: String,
    pub lines: Vec<LineEntry>,
}

/// Parsed `<line>` element
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineEntry {
    pub number: i64,
    pub missed_instructions: u64,
    pub covered_instructions: u64,
    pub missed_branches: u64,
    pub covered_branches: u64,
}

impl LineEntry {
    /// Positive line number with missed instructions and no covered ones.
    pub fn is_uncovered(&self) -> bool {
        self.number > 0 && self.missed_instructions > 0 && self.covered_instructions == 0
    }
}

/// Read and parse a JaCoCo XML report from disk.
pub fn parse_jacoco_file(path: &Path) -> Result<JacocoReport> {
    let bytes = fs::read(path).map_err(|err| {
        TestforgeError::io(
            format!("Failed to read coverage report at {}", path.display()),
            err,
        )
    })?;

    parse_jacoco_xml(&bytes).map_err(|err| err.in_file(path.display().to_string()))
}

/// Parse a JaCoCo XML document held in memory.
pub fn parse_jacoco_xml(bytes: &[u8]) -> Result<JacocoReport> {
    let mut reader = Reader::from_reader(bytes);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut builder = ReportBuilder::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(tag)) => builder.open(&tag, true)?,
            Ok(Event::Empty(tag)) => builder.open(&tag, false)?,
            Ok(Event::End(_)) => builder.close()?,
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(TestforgeError::parse(
                    FORMAT,
                    format!(
                        "Failed to parse JaCoCo XML at byte {}: {}",
                        reader.buffer_position(),
                        err
                    ),
                ));
            }
            _ => {}
        }
        buf.clear();
    }

    builder.finish()
}

/// Element currently open in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Report,
    Package,
    Class,
    Method,
    SourceFile,
    Other,
}

/// Assembles the element tree while streaming events.
///
/// Counters and lines attach to the innermost open element only, so a
/// package's counters never leak into its classes and vice versa.
#[derive(Default)]
struct ReportBuilder {
    frames: Vec<Frame>,
    report: Option<JacocoReport>,
    package: Option<PackageElement>,
    class: Option<ClassElement>,
    method: Option<MethodElement>,
    source_file: Option<SourceFileElement>,
    finished: Option<JacocoReport>,
}

impl ReportBuilder {
    fn open(&mut self, tag: &BytesStart<'_>, has_children: bool) -> Result<()> {
        let element = String::from_utf8_lossy(tag.name().as_ref()).into_owned();
        let parent = self.frames.last().copied();

        let frame = match (parent, element.as_str()) {
            (None, "report") if self.finished.is_none() => {
                self.report = Some(JacocoReport {
                    name: attribute_value(tag, b"name").unwrap_or_default(),
                    ..JacocoReport::default()
                });
                Frame::Report
            }
            (None, _) => {
                return Err(TestforgeError::parse(
                    FORMAT,
                    format!("Expected a single <report> root element, found <{element}>"),
                ));
            }
            (Some(Frame::Report), "package") => {
                self.package = Some(PackageElement {
                    name: attribute_value(tag, b"name").unwrap_or_default(),
                    ..PackageElement::default()
                });
                Frame::Package
            }
            (Some(Frame::Package), "class") => {
                self.class = Some(ClassElement {
                    name: attribute_value(tag, b"name").filter(|name| !name.is_empty()),
                    source_file_name: attribute_value(tag, b"sourcefilename"),
                    ..ClassElement::default()
                });
                Frame::Class
            }
            (Some(Frame::Package), "sourcefile") => {
                self.source_file = Some(SourceFileElement {
                    name: attribute_value(tag, b"name").unwrap_or_default(),
                    lines: Vec::new(),
                });
                Frame::SourceFile
            }
            (Some(Frame::Class), "method") => {
                self.method = Some(MethodElement {
                    name: attribute_value(tag, b"name").unwrap_or_default(),
                    descriptor: attribute_value(tag, b"desc").unwrap_or_default(),
                    line: numeric_attribute(tag, b"line", "method")?,
                    ..MethodElement::default()
                });
                Frame::Method
            }
            (Some(parent), "counter") => {
                if let Some(counter) = parse_counter(tag)? {
                    self.attach_counter(parent, counter);
                }
                Frame::Other
            }
            (Some(parent), "line") => {
                let line = parse_line(tag)?;
                match parent {
                    Frame::Method => {
                        if let Some(method) = self.method.as_mut() {
                            method.lines.push(line);
                        }
                    }
                    Frame::SourceFile => {
                        if let Some(source_file) = self.source_file.as_mut() {
                            source_file.lines.push(line);
                        }
                    }
                    _ => {}
                }
                Frame::Other
            }
            _ => Frame::Other,
        };

        self.frames.push(frame);
        if !has_children {
            self.close()?;
        }
        Ok(())
    }

    fn attach_counter(&mut self, parent: Frame, counter: CoverageCounter) {
        let counters = match parent {
            Frame::Report => self.report.as_mut().map(|r| &mut r.counters),
            Frame::Package => self.package.as_mut().map(|p| &mut p.counters),
            Frame::Class => self.class.as_mut().map(|c| &mut c.counters),
            Frame::Method => self.method.as_mut().map(|m| &mut m.counters),
            Frame::SourceFile | Frame::Other => None,
        };
        if let Some(counters) = counters {
            counters.push(counter);
        }
    }

    fn close(&mut self) -> Result<()> {
        let frame = self.frames.pop().ok_or_else(|| {
            TestforgeError::parse(FORMAT, "Closing tag without a matching opening tag")
        })?;

        match frame {
            Frame::Method => {
                if let (Some(method), Some(class)) = (self.method.take(), self.class.as_mut()) {
                    class.methods.push(method);
                }
            }
            Frame::Class => {
                if let (Some(class), Some(package)) = (self.class.take(), self.package.as_mut()) {
                    package.classes.push(class);
                }
            }
            Frame::SourceFile => {
                if let (Some(source_file), Some(package)) =
                    (self.source_file.take(), self.package.as_mut())
                {
                    package.source_files.push(source_file);
                }
            }
            Frame::Package => {
                if let (Some(package), Some(report)) = (self.package.take(), self.report.as_mut()) {
                    report.packages.push(package);
                }
            }
            Frame::Report => self.finished = self.report.take(),
            Frame::Other => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<JacocoReport> {
        if let Some(open) = self.frames.last() {
            return Err(TestforgeError::parse(
                FORMAT,
                format!("Unexpected end of document inside {open:?} element"),
            ));
        }
        self.finished
            .ok_or_else(|| TestforgeError::parse(FORMAT, "Document has no <report> root element"))
    }
}

fn parse_counter(tag: &BytesStart<'_>) -> Result<Option<CoverageCounter>> {
    let Some(kind) = attribute_value(tag, b"type").and_then(|t| CounterKind::from_report_name(&t))
    else {
        return Ok(None);
    };

    Ok(Some(CoverageCounter::new(
        kind,
        numeric_attribute(tag, b"missed", "counter")?,
        numeric_attribute(tag, b"covered", "counter")?,
    )))
}

fn parse_line(tag: &BytesStart<'_>) -> Result<LineEntry> {
    Ok(LineEntry {
        number: numeric_attribute(tag, b"nr", "line")?,
        missed_instructions: numeric_attribute(tag, b"mi", "line")?,
        covered_instructions: numeric_attribute(tag, b"ci", "line")?,
        missed_branches: numeric_attribute(tag, b"mb", "line")?,
        covered_branches: numeric_attribute(tag, b"cb", "line")?,
    })
}

/// Unescaped attribute text, falling back to a lossy copy of the raw bytes.
pub(crate) fn attribute_value(tag: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    tag.attributes()
        .with_checks(false)
        .flatten()
        .find(|attr| attr.key.as_ref() == name)
        .map(|attr| match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        })
}

/// Missing numeric attributes read as zero; present but malformed ones are errors.
fn numeric_attribute<T>(tag: &BytesStart<'_>, name: &[u8], element: &str) -> Result<T>
where
    T: FromStr + Default,
{
    match attribute_value(tag, name) {
        None => Ok(T::default()),
        Some(raw) => raw.trim().parse::<T>().map_err(|_| {
            TestforgeError::parse(
                FORMAT,
                format!(
                    "Invalid {} value '{}' on <{}>",
                    String::from_utf8_lossy(name),
                    raw,
                    element
                ),
            )
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<!DOCTYPE report PUBLIC "-//JACOCO//DTD Report 1.1//EN" "report.dtd">
<report name="shop">
  <sessioninfo id="host-1" start="1" dump="2"/>
  <package name="com/shop">
    <class name="com/shop/Cart" sourcefilename="Cart.java">
      <method name="&lt;init&gt;" desc="()V" line="3">
        <counter type="INSTRUCTION" missed="0" covered="3"/>
      </method>
      <method name="total" desc="(Ljava/lang/String;)I" line="10">
        <counter type="INSTRUCTION" missed="4" covered="6"/>
        <counter type="BRANCH" missed="1" covered="1"/>
        <line nr="12" mi="2" ci="0" mb="1" cb="0"/>
      </method>
      <counter type="INSTRUCTION" missed="4" covered="9"/>
      <counter type="BRANCH" missed="1" covered="1"/>
    </class>
    <sourcefile name="Cart.java">
      <line nr="3" mi="0" ci="3" mb="0" cb="0"/>
      <line nr="11" mi="2" ci="0" mb="0" cb="0"/>
      <counter type="LINE" missed="1" covered="3"/>
    </sourcefile>
    <counter type="INSTRUCTION" missed="4" covered="9"/>
  </package>
  <counter type="INSTRUCTION" missed="4" covered="9"/>
  <counter type="BRANCH" missed="1" covered="1"/>
</report>"#;

    #[test]
    fn parses_nested_structure() {
        let report = parse_jacoco_xml(REPORT.as_bytes()).unwrap();
        assert_eq!(report.name, "shop");
        assert_eq!(report.counters.len(), 2);
        assert_eq!(report.packages.len(), 1);

        let package = &report.packages[0];
        assert_eq!(package.name, "com/shop");
        assert_eq!(package.counters.len(), 1);
        assert_eq!(package.source_files.len(), 1);
        assert_eq!(package.source_files[0].lines.len(), 2);

        let class = &package.classes[0];
        assert_eq!(class.name.as_deref(), Some("com/shop/Cart"));
        assert_eq!(class.source_file_name.as_deref(), Some("Cart.java"));
        assert_eq!(class.counters.len(), 2);
        assert_eq!(class.methods.len(), 2);
    }

    #[test]
    fn unescapes_method_names_and_keeps_counters_local() {
        let report = parse_jacoco_xml(REPORT.as_bytes()).unwrap();
        let methods = &report.packages[0].classes[0].methods;

        assert_eq!(methods[0].name, "<init>");
        assert_eq!(methods[0].counters.len(), 1);
        assert!(methods[0].lines.is_empty());

        assert_eq!(methods[1].descriptor, "(Ljava/lang/String;)I");
        assert_eq!(methods[1].line, 10);
        assert_eq!(methods[1].counters.len(), 2);
        assert_eq!(methods[1].lines.len(), 1);
        assert!(methods[1].lines[0].is_uncovered());
    }

    #[test]
    fn uncovered_requires_zero_covered_instructions() {
        let partially = LineEntry {
            number: 5,
            missed_instructions: 3,
            covered_instructions: 1,
            ..LineEntry::default()
        };
        let unnumbered = LineEntry {
            number: 0,
            missed_instructions: 3,
            ..LineEntry::default()
        };
        assert!(!partially.is_uncovered());
        assert!(!unnumbered.is_uncovered());
    }

    #[test]
    fn unknown_counter_types_are_ignored() {
        let xml = r#"<report name="r"><counter type="WIDGET" missed="1" covered="1"/></report>"#;
        let report = parse_jacoco_xml(xml.as_bytes()).unwrap();
        assert!(report.counters.is_empty());
    }

    #[test]
    fn wrong_root_element_is_a_parse_error() {
        let err = parse_jacoco_xml(b"<coverage/>").unwrap_err();
        assert!(matches!(err, TestforgeError::Parse { .. }));
    }

    #[test]
    fn truncated_document_is_a_parse_error() {
        let err = parse_jacoco_xml(b"<report name=\"r\"><package name=\"p\">").unwrap_err();
        assert!(matches!(err, TestforgeError::Parse { .. }));
    }

    #[test]
    fn mismatched_tags_are_a_parse_error() {
        let err = parse_jacoco_xml(b"<report><package></class></report>").unwrap_err();
        assert!(matches!(err, TestforgeError::Parse { .. }));
    }

    #[test]
    fn non_numeric_counter_is_a_parse_error() {
        let xml = r#"<report><counter type="INSTRUCTION" missed="many" covered="1"/></report>"#;
        let err = parse_jacoco_xml(xml.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("missed"));
    }

    #[test]
    fn empty_document_has_no_root() {
        let err = parse_jacoco_xml(b"").unwrap_err();
        assert!(matches!(err, TestforgeError::Parse { .. }));
    }

    #[test]
    fn parse_errors_carry_the_file_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jacoco.xml");
        fs::write(&path, "<report><package>").unwrap();

        let err = parse_jacoco_file(&path).unwrap_err();
        match err {
            TestforgeError::Parse { file_path, .. } => {
                assert_eq!(file_path, Some(path.display().to_string()));
            }
            other => panic!("Expected Parse error, got {other:?}"),
        }
    }
}
