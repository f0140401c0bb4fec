//! XML emission for validated documents.
//!
//! A thin structural mapping: the document tree is already validated, so the
//! writer only formats. [`render`] is the seam callers should use — it runs
//! the document orchestrator first and refuses to serialize anything invalid.
//! Emission and escaping go through `quick_xml`; nothing here writes markup
//! by hand.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;

use cutplan_core::{Lane, Moment, Span};
use cutplan_timeline::{
    validate_document, ConnectedElement, Document, DocumentError, Payload, Registry, Resource,
    SpineElement,
};

/// Failures while emitting XML text.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("xml write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("emitted xml is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

type XmlWriter = Writer<Vec<u8>>;

fn write_resource(writer: &mut XmlWriter, resource: &Resource) -> std::io::Result<()> {
    match resource {
        Resource::Asset {
            id,
            name,
            source_path,
            uid,
            media_kind,
            duration,
        } => {
            let mut elem = BytesStart::new("asset");
            elem.push_attribute(("id", id.to_string().as_str()));
            elem.push_attribute(("name", name.as_str()));
            elem.push_attribute(("src", source_path.as_str()));
            elem.push_attribute(("uid", uid.to_string().as_str()));
            elem.push_attribute(("kind", media_kind.to_string().as_str()));
            elem.push_attribute(("duration", duration.to_string().as_str()));
            writer.write_event(Event::Empty(elem))
        }
        Resource::Format {
            id,
            name,
            width,
            height,
            frame_duration,
            ..
        } => {
            let mut elem = BytesStart::new("format");
            elem.push_attribute(("id", id.to_string().as_str()));
            elem.push_attribute(("name", name.as_str()));
            elem.push_attribute(("width", width.to_string().as_str()));
            elem.push_attribute(("height", height.to_string().as_str()));
            if let Some(fd) = frame_duration {
                elem.push_attribute(("frameDuration", fd.to_string().as_str()));
            }
            writer.write_event(Event::Empty(elem))
        }
        Resource::Effect {
            id,
            name,
            effect_uid,
        } => {
            let mut elem = BytesStart::new("effect");
            elem.push_attribute(("id", id.to_string().as_str()));
            elem.push_attribute(("name", name.as_str()));
            elem.push_attribute(("uid", effect_uid.as_str()));
            writer.write_event(Event::Empty(elem))
        }
    }
}

fn push_placement(elem: &mut BytesStart<'_>, name: &str, offset: Moment, duration: Span, lane: Lane) {
    elem.push_attribute(("name", name));
    elem.push_attribute(("offset", offset.to_string().as_str()));
    elem.push_attribute(("duration", duration.to_string().as_str()));
    // Lane 0 is the primary storyline and is never written.
    if !lane.is_primary() {
        elem.push_attribute(("lane", lane.to_string().as_str()));
    }
}

fn write_title_body(
    writer: &mut XmlWriter,
    text: &str,
    style_refs: &[String],
) -> std::io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new("text")))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new("text")))?;
    for style in style_refs {
        let mut elem = BytesStart::new("text-style-ref");
        elem.push_attribute(("ref", style.as_str()));
        writer.write_event(Event::Empty(elem))?;
    }
    Ok(())
}

fn write_connected(writer: &mut XmlWriter, child: &ConnectedElement) -> std::io::Result<()> {
    match &child.payload {
        Payload::Title {
            effect_ref,
            text,
            style_refs,
        } => {
            let mut elem = BytesStart::new("title");
            elem.push_attribute(("ref", effect_ref.to_string().as_str()));
            push_placement(&mut elem, &child.name, child.offset, child.duration, child.lane);
            writer.write_event(Event::Start(elem))?;
            write_title_body(writer, text, style_refs)?;
            writer.write_event(Event::End(BytesEnd::new("title")))
        }
        Payload::Clip { asset_ref, .. } => {
            let mut elem = BytesStart::new("clip");
            elem.push_attribute(("ref", asset_ref.to_string().as_str()));
            push_placement(&mut elem, &child.name, child.offset, child.duration, child.lane);
            writer.write_event(Event::Empty(elem))
        }
        Payload::Video { asset_ref } => {
            let mut elem = BytesStart::new("video");
            elem.push_attribute(("ref", asset_ref.to_string().as_str()));
            push_placement(&mut elem, &child.name, child.offset, child.duration, child.lane);
            writer.write_event(Event::Empty(elem))
        }
        Payload::Generator { effect_ref } => {
            let mut elem = BytesStart::new("generator");
            elem.push_attribute(("ref", effect_ref.to_string().as_str()));
            push_placement(&mut elem, &child.name, child.offset, child.duration, child.lane);
            writer.write_event(Event::Empty(elem))
        }
        // Connected gaps are rejected by structural validation.
        Payload::Gap => Ok(()),
    }
}

fn write_element(writer: &mut XmlWriter, element: &SpineElement) -> std::io::Result<()> {
    match &element.payload {
        Payload::Clip {
            asset_ref,
            format_ref,
            connected,
        } => {
            let mut elem = BytesStart::new("clip");
            elem.push_attribute(("ref", asset_ref.to_string().as_str()));
            push_placement(
                &mut elem,
                &element.name,
                element.offset,
                element.duration,
                element.lane,
            );
            if let Some(format) = format_ref {
                elem.push_attribute(("format", format.to_string().as_str()));
            }
            if connected.is_empty() {
                writer.write_event(Event::Empty(elem))
            } else {
                writer.write_event(Event::Start(elem))?;
                for child in connected {
                    write_connected(writer, child)?;
                }
                writer.write_event(Event::End(BytesEnd::new("clip")))
            }
        }
        Payload::Video { asset_ref } => {
            let mut elem = BytesStart::new("video");
            elem.push_attribute(("ref", asset_ref.to_string().as_str()));
            push_placement(
                &mut elem,
                &element.name,
                element.offset,
                element.duration,
                element.lane,
            );
            writer.write_event(Event::Empty(elem))
        }
        Payload::Title {
            effect_ref,
            text,
            style_refs,
        } => {
            let mut elem = BytesStart::new("title");
            elem.push_attribute(("ref", effect_ref.to_string().as_str()));
            push_placement(
                &mut elem,
                &element.name,
                element.offset,
                element.duration,
                element.lane,
            );
            writer.write_event(Event::Start(elem))?;
            write_title_body(writer, text, style_refs)?;
            writer.write_event(Event::End(BytesEnd::new("title")))
        }
        Payload::Generator { effect_ref } => {
            let mut elem = BytesStart::new("generator");
            elem.push_attribute(("ref", effect_ref.to_string().as_str()));
            push_placement(
                &mut elem,
                &element.name,
                element.offset,
                element.duration,
                element.lane,
            );
            writer.write_event(Event::Empty(elem))
        }
        Payload::Gap => {
            let mut elem = BytesStart::new("gap");
            push_placement(
                &mut elem,
                &element.name,
                element.offset,
                element.duration,
                element.lane,
            );
            writer.write_event(Event::Empty(elem))
        }
    }
}

/// Format an already-validated document as XML text.
///
/// Callers that cannot guarantee prior validation should use [`render`].
pub fn write_document(document: &Document, registry: &Registry) -> Result<String, WriteError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut timeline = BytesStart::new("timeline");
    timeline.push_attribute(("name", document.name.as_str()));
    timeline.push_attribute(("duration", document.total_duration.to_string().as_str()));
    writer.write_event(Event::Start(timeline))?;

    writer.write_event(Event::Start(BytesStart::new("resources")))?;
    for resource in registry.iter() {
        write_resource(&mut writer, resource)?;
    }
    writer.write_event(Event::End(BytesEnd::new("resources")))?;

    writer.write_event(Event::Start(BytesStart::new("spine")))?;
    for element in document.spine.iter() {
        write_element(&mut writer, element)?;
    }
    writer.write_event(Event::End(BytesEnd::new("spine")))?;
    writer.write_event(Event::End(BytesEnd::new("timeline")))?;

    Ok(String::from_utf8(writer.into_inner())?)
}

/// Validate, then serialize. The only way an invalid document can reach the
/// writer is by bypassing this entry point.
pub fn render(document: &Document, registry: &Registry) -> Result<String, WriteError> {
    validate_document(document, registry)?;
    write_document(document, registry)
}
