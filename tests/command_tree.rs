//! The command tree on its own: parsing lines, grouping on render, and failures.

use osu_fmt::{
    ParseError, SerializationError,
    config::{ParseConfig, RenderConfig},
    reader::TextReader,
    storyboard::{
        Command, CommandContainer, Easing, ObjectKind, StoryboardObject,
        command::{Loop, Parameters, ParameterEffect, Transform, parse_commands},
        object::Sprite,
        parse_events,
    },
};
use pretty_assertions::assert_eq;

fn sprite() -> StoryboardObject {
    StoryboardObject::new(ObjectKind::Sprite(Sprite {
        path: "sb/dot.png".into(),
        x: 320.0,
        y: 240.0,
        ..Sprite::default()
    }))
}

#[test]
fn grouped_line_splits_and_regroups() {
    let commands: CommandContainer = parse_commands("F,0,0,1000,0,1,1,0,0,0.5").unwrap().into();
    assert_eq!(commands.len(), 3);
    assert!(commands.iter().all(|command| command.start_time() == 0));
    assert_eq!(
        commands.render(1, &RenderConfig::default()).unwrap(),
        [" F,0,0,1000,0,1,1,0,0,0.5"]
    );
}

#[test]
fn built_tree_renders() {
    let mut object = sprite();
    object.commands.push(Command::Fade(Transform {
        easing: Easing::QuadOut,
        start_time: 0,
        end_time: 500,
        start: 0.0,
        end: 1.0,
    }));
    object.commands.push(Command::Parameters(Parameters {
        easing: Easing::Linear,
        start_time: 0,
        end_time: 0,
        effect: ParameterEffect::HorizontalFlip,
    }));
    object.commands.push(Command::Loop(Loop {
        start_time: 500,
        loop_count: 3,
        commands: [
            Command::Scale(Transform::constant(Easing::Linear, 0, 100, 1.5)),
            Command::Scale(Transform::constant(Easing::Linear, 0, 100, 2.0)),
        ]
        .into_iter()
        .collect(),
    }));
    assert_eq!(
        object.render(&RenderConfig::default()).unwrap(),
        [
            "Sprite,Background,Centre,\"sb/dot.png\",320,240",
            " F,4,0,500,0,1",
            " P,0,0,0,H",
            " L,500,3",
            "  S,0,0,100,1.5,1.5,2,2",
        ]
    );
    assert_eq!(object.commands.as_slice()[2].end_time(), 800);
}

#[test]
fn parse_then_render_is_stable() {
    let source = "Sprite,Foreground,Centre,\"a.png\",0,0
 M,0,0,100,1,2,3,4,5,6
 C,0,0,100,255,0,0
 T,HitSoundSoftWhistle3,0,10000,2
  R,0,0,50,0,1
  L,0,4
   S,0,0,25,1,1.1
";
    let objects =
        parse_events(&mut TextReader::new(source), &ParseConfig::default()).unwrap();
    let lines = objects[0].render(&RenderConfig::default()).unwrap();
    assert_eq!(
        lines,
        [
            "Sprite,Foreground,Centre,\"a.png\",0,0",
            " M,0,0,100,1,2,3,4,5,6,5,6",
            " C,0,0,100,255,0,0,0,0,0",
            " T,HitSoundSoftWhistle3,0,10000,2",
            "  R,0,0,50,0,1",
            "  L,0,4",
            "   S,0,0,25,1,1.1",
        ]
    );
    let again = parse_events(
        &mut TextReader::new(&(lines.join("\n") + "\n")),
        &ParseConfig::default(),
    )
    .unwrap();
    assert_eq!(again, objects);
}

#[test]
fn parse_failures() {
    let cases: [(&str, fn(&ParseError) -> bool); 6] = [
        ("Sprite,0,0,\"a.png\",0,0\n Z,0,0,1,1\n", |e| {
            matches!(e, ParseError::UnknownCommandType(tag) if tag == "Z")
        }),
        ("Cloud,0,0\n", |e| {
            matches!(e, ParseError::UnknownEventType(name) if name == "Cloud")
        }),
        ("Sprite,0,0,\"a.png\",0,0\n T,HitSoundLoud,0,1\n", |e| {
            matches!(e, ParseError::UnknownTriggerName(_))
        }),
        ("Sprite,0,0,\"a.png\",0,0\n F,0,0,1\n", |e| {
            matches!(e, ParseError::MalformedLine(_))
        }),
        ("Sprite,0,0,\"a.png\",0,0\n F,0,0,1,x\n", |e| {
            matches!(e, ParseError::InvalidFieldValue { field: "number", .. })
        }),
        ("Sprite,0,0,\"a.png\",0,0\n F,0,0,1,1\n  F,0,0,1,1\n", |e| {
            matches!(e, ParseError::MalformedLine(_))
        }),
    ];
    for (source, expected) in cases {
        let error = parse_events(&mut TextReader::new(source), &ParseConfig::default())
            .unwrap_err();
        assert!(expected(error.content()), "{source:?}: {error}");
    }
}

#[test]
fn serialization_failures() {
    let mut object = sprite();
    object
        .commands
        .push(Command::Rotate(Transform::constant(Easing::Linear, 0, 1, f64::INFINITY)));
    assert_eq!(
        object.render(&RenderConfig::default()),
        Err(SerializationError::NonFiniteNumber(f64::INFINITY))
    );

    let object = StoryboardObject::new(ObjectKind::Sprite(Sprite {
        path: "a\nb.png".into(),
        ..Sprite::default()
    }));
    assert!(matches!(
        object.render(&RenderConfig::default()),
        Err(SerializationError::UnrepresentablePath(_))
    ));
}

#[test]
fn extreme_magnitudes_use_exponents() {
    let commands: CommandContainer = parse_commands("F,0,0,100,0.0000001,1e21").unwrap().into();
    let rendered = commands.render(1, &RenderConfig::default()).unwrap();
    assert_eq!(rendered, [" F,0,0,100,1e-07,1e+21"]);
    let again: CommandContainer = parse_commands(rendered[0].trim_start())
        .unwrap()
        .into();
    assert_eq!(again, commands);
}
