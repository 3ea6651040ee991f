//! Parser for Quake 3 `.shader` definition files. One file holds any number
//! of shader blocks: a logical shader path followed by a brace-delimited body
//! of directives and nested stage blocks.
//!
//! The grammar carried here is deliberately partial: real shader scripts are
//! full of renderer directives this layer does not model, so unknown
//! directives are skipped along with their same-line arguments. Structural
//! damage (a missing brace, EOF inside a block) is a `ParseError` for the
//! whole file; the loader decides what to do with that.
use std::iter::Peekable;
use std::path::PathBuf;
use std::vec::IntoIter;

use thiserror::Error;
use tracing::debug;

use crate::shader::{BlendFunc, Culling, Quake3Shader, ShaderStage, StageMap};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: expected '{{' after shader path, found {found}")]
    ExpectedBlock { line: usize, found: String },

    #[error("line {line}: unexpected '{{'")]
    UnexpectedOpen { line: usize },

    #[error("line {line}: unexpected '}}'")]
    UnexpectedClose { line: usize },

    #[error("unexpected end of file in block opened on line {line}")]
    UnclosedBlock { line: usize },

    #[error("unterminated comment starting on line {line}")]
    UnterminatedComment { line: usize },
}

#[derive(Debug, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    Word(String),
}

#[derive(Debug)]
struct Spanned {
    token: Token,
    line: usize,
}

type TokenStream = Peekable<IntoIter<Spanned>>;

/// Parses one definition file's text into the shaders it declares.
pub fn parse(input: &str) -> Result<Vec<Quake3Shader>, ParseError> {
    let mut tokens = tokenize(input)?.into_iter().peekable();
    let mut shaders = Vec::new();

    while let Some(spanned) = tokens.next() {
        match spanned.token {
            Token::Word(name) => {
                let open_line = match tokens.next() {
                    Some(Spanned {
                        token: Token::Open,
                        line,
                    }) => line,
                    Some(other) => {
                        return Err(ParseError::ExpectedBlock {
                            line: other.line,
                            found: describe(&other.token),
                        })
                    }
                    None => {
                        return Err(ParseError::ExpectedBlock {
                            line: spanned.line,
                            found: "end of file".to_string(),
                        })
                    }
                };
                let shader = Quake3Shader::new(PathBuf::from(name));
                shaders.push(parse_body(shader, open_line, &mut tokens)?);
            }
            Token::Open => return Err(ParseError::UnexpectedOpen { line: spanned.line }),
            Token::Close => return Err(ParseError::UnexpectedClose { line: spanned.line }),
        }
    }

    Ok(shaders)
}

fn parse_body(
    mut shader: Quake3Shader,
    open_line: usize,
    tokens: &mut TokenStream,
) -> Result<Quake3Shader, ParseError> {
    loop {
        let Some(spanned) = tokens.next() else {
            return Err(ParseError::UnclosedBlock { line: open_line });
        };
        match spanned.token {
            Token::Close => return Ok(shader),
            Token::Open => {
                let stage = parse_stage(spanned.line, tokens)?;
                shader.stages.push(stage);
            }
            Token::Word(word) => {
                apply_directive(&mut shader, &word, spanned.line, tokens);
            }
        }
    }
}

fn apply_directive(shader: &mut Quake3Shader, word: &str, line: usize, tokens: &mut TokenStream) {
    match word.to_ascii_lowercase().as_str() {
        "qer_editorimage" => {
            if let Some(arg) = take_arg(tokens, line) {
                shader.editor_image = Some(PathBuf::from(arg));
            }
        }
        "q3map_lightimage" => {
            if let Some(arg) = take_arg(tokens, line) {
                shader.light_image = Some(PathBuf::from(arg));
            }
        }
        "surfaceparm" => {
            if let Some(arg) = take_arg(tokens, line) {
                shader.surface_parms.insert(arg.to_ascii_lowercase());
            }
        }
        "cull" => {
            if let Some(arg) = take_arg(tokens, line) {
                match arg.to_ascii_lowercase().as_str() {
                    "front" | "frontsided" => shader.culling = Culling::Front,
                    "back" | "backside" | "backsided" => shader.culling = Culling::Back,
                    "none" | "twosided" | "disable" => shader.culling = Culling::None,
                    other => debug!(line, value = other, "ignoring unknown cull mode"),
                }
            }
        }
        other => {
            debug!(line, directive = other, "skipping unknown directive");
            skip_args(tokens, line);
        }
    }
}

fn parse_stage(open_line: usize, tokens: &mut TokenStream) -> Result<ShaderStage, ParseError> {
    let mut stage = ShaderStage::default();
    loop {
        let Some(spanned) = tokens.next() else {
            return Err(ParseError::UnclosedBlock { line: open_line });
        };
        match spanned.token {
            Token::Close => return Ok(stage),
            Token::Open => return Err(ParseError::UnexpectedOpen { line: spanned.line }),
            Token::Word(word) => match word.to_ascii_lowercase().as_str() {
                "map" | "clampmap" => {
                    if let Some(arg) = take_arg(tokens, spanned.line) {
                        stage.map = Some(parse_stage_map(&arg));
                    }
                }
                "blendfunc" => {
                    if let Some(first) = take_arg(tokens, spanned.line) {
                        stage.blend_func =
                            parse_blend_func(&first, take_arg(tokens, spanned.line));
                    }
                }
                other => {
                    debug!(line = spanned.line, directive = other, "skipping unknown stage directive");
                    skip_args(tokens, spanned.line);
                }
            },
        }
    }
}

fn parse_stage_map(arg: &str) -> StageMap {
    match arg.to_ascii_lowercase().as_str() {
        "$lightmap" => StageMap::Lightmap,
        "$whiteimage" => StageMap::Whiteimage,
        _ => StageMap::Path(PathBuf::from(arg)),
    }
}

fn parse_blend_func(first: &str, second: Option<String>) -> Option<BlendFunc> {
    match first.to_ascii_lowercase().as_str() {
        "add" => Some(BlendFunc::new("GL_ONE", "GL_ONE")),
        "filter" => Some(BlendFunc::new("GL_DST_COLOR", "GL_ZERO")),
        "blend" => Some(BlendFunc::new("GL_SRC_ALPHA", "GL_ONE_MINUS_SRC_ALPHA")),
        src => second.map(|dest| {
            BlendFunc::new(src.to_ascii_uppercase(), dest.to_ascii_uppercase())
        }),
    }
}

/// Takes the next token as a directive argument if it is a word on the same
/// line; directives never span lines in shader scripts.
fn take_arg(tokens: &mut TokenStream, line: usize) -> Option<String> {
    let is_arg = matches!(
        tokens.peek(),
        Some(Spanned {
            token: Token::Word(_),
            line: arg_line,
        }) if *arg_line == line
    );
    if !is_arg {
        return None;
    }
    match tokens.next() {
        Some(Spanned {
            token: Token::Word(word),
            ..
        }) => Some(word),
        _ => None,
    }
}

fn skip_args(tokens: &mut TokenStream, line: usize) {
    while take_arg(tokens, line).is_some() {}
}

fn describe(token: &Token) -> String {
    match token {
        Token::Open => "'{'".to_string(),
        Token::Close => "'}'".to_string(),
        Token::Word(word) => format!("'{word}'"),
    }
}

fn tokenize(input: &str) -> Result<Vec<Spanned>, ParseError> {
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\n' => line += 1,
            c if c.is_whitespace() => {}
            '{' => tokens.push(Spanned {
                token: Token::Open,
                line,
            }),
            '}' => tokens.push(Spanned {
                token: Token::Close,
                line,
            }),
            '/' if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        line += 1;
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                let start = line;
                chars.next();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        '\n' => line += 1,
                        '*' if chars.peek() == Some(&'/') => {
                            chars.next();
                            closed = true;
                            break;
                        }
                        _ => {}
                    }
                }
                if !closed {
                    return Err(ParseError::UnterminatedComment { line: start });
                }
            }
            first => {
                let mut word = String::new();
                word.push(first);
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || c == '{' || c == '}' {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                tokens.push(Spanned {
                    token: Token::Word(word),
                    line,
                });
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn parses_multiple_shaders_with_attributes() {
        let input = r#"
// base wall shaders
textures/brick
{
    qer_editorimage textures/brick_ed.tga
    surfaceparm NoImpact
    cull none
    {
        map $lightmap
    }
    {
        map textures/brick.tga
        blendFunc GL_ONE GL_ZERO
    }
}

textures/dirt
{
    q3map_lightimage textures/dirt_light.tga
}
"#;
        let shaders = parse(input).expect("parse");
        assert_eq!(shaders.len(), 2);

        let brick = &shaders[0];
        assert_eq!(brick.shader_path, Path::new("textures/brick"));
        assert_eq!(
            brick.editor_image.as_deref(),
            Some(Path::new("textures/brick_ed.tga"))
        );
        assert!(brick.surface_parms.contains("noimpact"));
        assert_eq!(brick.culling, Culling::None);
        assert_eq!(brick.stages.len(), 2);
        assert_eq!(brick.stages[0].map, Some(StageMap::Lightmap));
        assert_eq!(
            brick.stages[1].map,
            Some(StageMap::Path(PathBuf::from("textures/brick.tga")))
        );
        assert_eq!(
            brick.stages[1].blend_func,
            Some(BlendFunc::new("GL_ONE", "GL_ZERO"))
        );

        let dirt = &shaders[1];
        assert_eq!(
            dirt.light_image.as_deref(),
            Some(Path::new("textures/dirt_light.tga"))
        );
    }

    #[test]
    fn skips_unknown_directives_with_arguments() {
        let input = r#"
textures/lava
{
    q3map_surfacelight 3000
    tessSize 256
    deformVertexes wave 100 sin 0 1 0 0.5
    surfaceparm lava
}
"#;
        let shaders = parse(input).expect("parse");
        assert_eq!(shaders.len(), 1);
        assert!(shaders[0].surface_parms.contains("lava"));
    }

    #[test]
    fn expands_blendfunc_presets() {
        let input = "textures/flame { { map textures/flame.tga blendfunc add } }";
        let shaders = parse(input).expect("parse");
        assert_eq!(
            shaders[0].stages[0].blend_func,
            Some(BlendFunc::new("GL_ONE", "GL_ONE"))
        );
    }

    #[test]
    fn tolerates_block_comments() {
        let input = "/* header\n spanning lines */ textures/a { /* inline */ cull back }";
        let shaders = parse(input).expect("parse");
        assert_eq!(shaders[0].culling, Culling::Back);
    }

    #[test]
    fn reports_missing_open_brace() {
        let err = parse("textures/a\ncull back").unwrap_err();
        assert!(matches!(err, ParseError::ExpectedBlock { line: 2, .. }));
    }

    #[test]
    fn reports_unclosed_block_with_opening_line() {
        let err = parse("textures/a\n{\n    cull back\n").unwrap_err();
        assert!(matches!(err, ParseError::UnclosedBlock { line: 2 }));
    }

    #[test]
    fn reports_stray_close_brace() {
        let err = parse("}").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedClose { line: 1 }));
    }

    #[test]
    fn empty_input_yields_no_shaders() {
        assert!(parse("// nothing here\n").expect("parse").is_empty());
    }
}
