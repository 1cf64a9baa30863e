use crate::ast::{BodyDecl, ForceDecl, ForceKind, FramesDecl, Scenario, SimulateDecl, StepsDecl};
use crate::diagnostics::Span;
use glam::Vec2;
use thiserror::Error;

/// Parse error with optional span information
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{message}")]
    SyntaxError {
        message: String,
        span: Option<Span>,
    },
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Option<Span>) -> Self {
        Self::SyntaxError {
            message: message.into(),
            span,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self::SyntaxError {
            message: message.into(),
            span: None,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::SyntaxError { span, .. } => *span,
        }
    }
}

/// Helper to track byte offsets while parsing
struct ParseContext {
    source_len: usize,
    line_offsets: Vec<usize>, // Byte offset of start of each line
}

impl ParseContext {
    fn new(source: &str) -> Self {
        let mut line_offsets = vec![0];
        let mut offset = 0;
        for ch in source.chars() {
            offset += ch.len_utf8();
            if ch == '\n' {
                line_offsets.push(offset);
            }
        }
        Self {
            source_len: source.len(),
            line_offsets,
        }
    }

    /// Get byte offset for start of line (0-indexed)
    fn line_start(&self, line: usize) -> usize {
        self.line_offsets.get(line).copied().unwrap_or(self.source_len)
    }

    /// Create a span for the entire line
    fn full_line_span(&self, line: usize) -> Span {
        Span::new(self.line_start(line), self.line_start(line + 1))
    }
}

/// Parse a scenario from source text
pub fn parse_scenario(source: &str) -> Result<Scenario, ParseError> {
    let ctx = ParseContext::new(source);
    let mut bodies = Vec::new();
    let mut forces = Vec::new();
    let mut simulate: Option<SimulateDecl> = None;
    let mut frames = Vec::new();
    let mut steps = Vec::new();

    for (i, raw) in source.lines().enumerate() {
        let line = strip_comment(raw).trim();
        let span = Some(ctx.full_line_span(i));

        if line.is_empty() {
            continue;
        }

        let keyword = line.split_whitespace().next().unwrap_or("");
        match keyword {
            "body" => bodies.push(parse_body(line, span)?),
            "force" => forces.push(parse_force(line, span)?),
            "simulate" => {
                if simulate.is_some() {
                    return Err(ParseError::new("Duplicate 'simulate' declaration", span));
                }
                simulate = Some(parse_simulate(line, span)?);
            }
            "frames" => frames.push(parse_frames(line, span)?),
            "steps" => steps.push(parse_steps(line, span)?),
            _ => {
                return Err(ParseError::new(
                    format!("Unexpected token: {}", keyword),
                    span,
                ));
            }
        }
    }

    let simulate =
        simulate.ok_or_else(|| ParseError::message("Missing 'simulate' declaration"))?;
    if bodies.is_empty() {
        return Err(ParseError::message("Missing 'body' declaration"));
    }

    Ok(Scenario {
        bodies,
        forces,
        simulate,
        frames,
        steps,
    })
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Parse a body declaration: `body at (x, y)` with optional `velocity (vx, vy)`
fn parse_body(line: &str, span: Option<Span>) -> Result<BodyDecl, ParseError> {
    let rest = line
        .strip_prefix("body")
        .map(str::trim_start)
        .ok_or_else(|| ParseError::new("Expected 'body' keyword", span))?;

    let rest = rest.strip_prefix("at").ok_or_else(|| {
        ParseError::new(format!("Expected 'at' in body declaration: {}", line), span)
    })?;
    let (position, rest) = parse_vec2(rest, line, span)?;

    let rest = rest.trim();
    let velocity = if rest.is_empty() {
        Vec2::ZERO
    } else {
        let after = rest.strip_prefix("velocity").ok_or_else(|| {
            ParseError::new(format!("Expected 'velocity' after position: {}", line), span)
        })?;
        let (velocity, trailing) = parse_vec2(after, line, span)?;
        expect_end(trailing, line, span)?;
        velocity
    };

    Ok(BodyDecl {
        position,
        velocity,
        span,
    })
}

/// Parse a force declaration:
/// `force gravity g = (x, y)`, `force drag k = c` or `force uniform accel = (x, y) drag = c`
fn parse_force(line: &str, span: Option<Span>) -> Result<ForceDecl, ParseError> {
    let rest = line
        .strip_prefix("force")
        .map(str::trim_start)
        .ok_or_else(|| ParseError::new("Expected 'force' keyword", span))?;

    let kind_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let force_type = &rest[..kind_end];
    let params = rest[kind_end..].trim();

    let kind = match force_type {
        "gravity" => {
            let g_str = params.strip_prefix("g =").ok_or_else(|| {
                ParseError::new(format!("Expected 'g =' in gravity force: {}", line), span)
            })?;
            let (g, trailing) = parse_vec2(g_str, line, span)?;
            expect_end(trailing, line, span)?;
            ForceKind::Gravity { g }
        }
        "drag" => {
            let k_str = params.strip_prefix("k =").ok_or_else(|| {
                ParseError::new(format!("Expected 'k =' in drag force: {}", line), span)
            })?;
            ForceKind::Drag {
                k: parse_number(k_str, span)?,
            }
        }
        "uniform" => {
            let accel_str = params.strip_prefix("accel =").ok_or_else(|| {
                ParseError::new(format!("Expected 'accel =' in uniform force: {}", line), span)
            })?;
            let (accel, after) = parse_vec2(accel_str, line, span)?;
            let drag_str = after.trim().strip_prefix("drag =").ok_or_else(|| {
                ParseError::new(format!("Expected 'drag =' in uniform force: {}", line), span)
            })?;
            ForceKind::Uniform {
                accel,
                drag: parse_number(drag_str, span)?,
            }
        }
        _ => {
            return Err(ParseError::new(
                format!("Unknown force type: {}", force_type),
                span,
            ));
        }
    };

    Ok(ForceDecl { kind, span })
}

/// Parse a simulate declaration: `simulate fixed_dt = x` with optional `max_frame_dt = y`
fn parse_simulate(line: &str, span: Option<Span>) -> Result<SimulateDecl, ParseError> {
    let rest = line
        .strip_prefix("simulate")
        .ok_or_else(|| ParseError::new("Expected 'simulate' keyword", span))?;

    let dt_start = rest.find("fixed_dt =").ok_or_else(|| {
        ParseError::new(format!("Expected 'fixed_dt =' in simulate: {}", line), span)
    })?;
    if !rest[..dt_start].trim().is_empty() {
        return Err(ParseError::new(
            format!("Expected 'fixed_dt =' first in simulate: {}", line),
            span,
        ));
    }
    let after_dt = &rest[dt_start + "fixed_dt =".len()..];

    let (dt_str, max_frame_dt) = match after_dt.find("max_frame_dt =") {
        Some(max_start) => {
            let max_str = &after_dt[max_start + "max_frame_dt =".len()..];
            (&after_dt[..max_start], Some(parse_number(max_str, span)?))
        }
        None => (after_dt, None),
    };

    Ok(SimulateDecl {
        fixed_dt: parse_number(dt_str, span)?,
        max_frame_dt,
        span,
    })
}

/// Parse frame deltas: `frames a, b, c` or `frames d repeat n`
fn parse_frames(line: &str, span: Option<Span>) -> Result<FramesDecl, ParseError> {
    let rest = line
        .strip_prefix("frames")
        .ok_or_else(|| ParseError::new("Expected 'frames' keyword", span))?;

    if let Some(repeat_pos) = rest.find(" repeat ") {
        let delta = parse_number(&rest[..repeat_pos], span)?;
        let count_str = rest[repeat_pos + " repeat ".len()..].trim();
        let repeat = count_str.parse::<u32>().map_err(|_| {
            ParseError::new(format!("Invalid repeat count: {}", count_str), span)
        })?;
        return Ok(FramesDecl {
            deltas: vec![delta],
            repeat,
            span,
        });
    }

    let deltas = rest
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| parse_number(s, span))
        .collect::<Result<Vec<_>, _>>()?;
    if deltas.is_empty() {
        return Err(ParseError::new(
            format!("Expected at least one frame delta: {}", line),
            span,
        ));
    }

    Ok(FramesDecl {
        deltas,
        repeat: 1,
        span,
    })
}

/// Parse a step count: `steps n`
fn parse_steps(line: &str, span: Option<Span>) -> Result<StepsDecl, ParseError> {
    let rest = line
        .strip_prefix("steps")
        .map(str::trim)
        .ok_or_else(|| ParseError::new("Expected 'steps' keyword", span))?;
    let count = rest
        .parse::<u64>()
        .map_err(|_| ParseError::new(format!("Invalid step count: {}", rest), span))?;
    Ok(StepsDecl { count, span })
}

/// Parse `(x, y)` at the start of `s`, returning the vector and the remaining text
fn parse_vec2<'a>(s: &'a str, line: &str, span: Option<Span>) -> Result<(Vec2, &'a str), ParseError> {
    let s = s.trim_start();
    let inner = s.strip_prefix('(').ok_or_else(|| {
        ParseError::new(format!("Expected '(' in vector: {}", line), span)
    })?;
    let close = inner.find(')').ok_or_else(|| {
        ParseError::new(format!("Expected ')' in vector: {}", line), span)
    })?;

    let coords: Vec<&str> = inner[..close].split(',').map(|c| c.trim()).collect();
    if coords.len() != 2 {
        return Err(ParseError::new(
            format!("Expected two components in vector: {}", line),
            span,
        ));
    }

    let x = parse_number(coords[0], span)?;
    let y = parse_number(coords[1], span)?;
    Ok((Vec2::new(x, y), &inner[close + 1..]))
}

fn parse_number(s: &str, span: Option<Span>) -> Result<f32, ParseError> {
    let s = s.trim();
    s.parse::<f32>()
        .map_err(|_| ParseError::new(format!("Invalid number: {}", s), span))
}

fn expect_end(trailing: &str, line: &str, span: Option<Span>) -> Result<(), ParseError> {
    if trailing.trim().is_empty() {
        Ok(())
    } else {
        Err(ParseError::new(
            format!("Unexpected trailing input '{}' in: {}", trailing.trim(), line),
            span,
        ))
    }
}
