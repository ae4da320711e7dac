use xmlseed_core::{
    AttributeDecl, AttributeUsage, AttributeUse, Builtin, CompiledSchema, ComplexTypeDef,
    ContentType, Derivation, ElementDecl, Facets, Form, NamespaceConstraint, Occurs, Particle,
    ProcessContents, QName, SchemaIndex, SimpleTypeDef, SimpleVariety, TypeDefinition, Wildcard,
};
use xmlseed_generate::builder::OTHER_NAMESPACE;
use xmlseed_generate::instance::{InstanceElement, InstanceGroup};
use xmlseed_generate::{
    DocumentEvent, EventRecorder, GenerateOptions, GenerationEngine, GenerationError,
    GenerationReport, IdRegistry, InstanceTree, InstanceTreeBuilder, InstanceTreeEmitter,
};

fn typed(name: &str, type_name: &str) -> ElementDecl {
    ElementDecl::new(QName::local(name), Some(QName::xs(type_name)))
}

fn with_type(name: &str, type_name: &str) -> ElementDecl {
    ElementDecl::new(QName::local(name), Some(QName::local(type_name)))
}

fn element_content(name: &str, particle: Particle) -> ComplexTypeDef {
    ComplexTypeDef::new(QName::local(name), ContentType::Elements { particle })
}

fn schema_with(elements: Vec<ElementDecl>, types: Vec<TypeDefinition>) -> CompiledSchema {
    let mut schema = CompiledSchema::new("0.1");
    schema.elements = elements;
    schema.types = types;
    schema
}

fn record(schema: &CompiledSchema, options: GenerateOptions) -> (EventRecorder, GenerationReport) {
    let mut recorder = EventRecorder::new();
    let report = GenerationEngine::new(options)
        .run(schema, &mut recorder)
        .expect("generation succeeds");
    (recorder, report)
}

fn required(attribute: AttributeDecl) -> AttributeUse {
    AttributeUse {
        attribute,
        usage: AttributeUsage::Required,
    }
}

#[test]
fn optional_recursion_is_not_expanded() {
    let node_type = element_content(
        "NodeType",
        Particle::sequence(vec![
            Particle::element(typed("label", "string")),
            Particle::element_ref(QName::local("node")).with_occurs(0, Occurs::Unbounded),
        ]),
    );
    let schema = schema_with(
        vec![with_type("node", "NodeType")],
        vec![TypeDefinition::Complex(node_type)],
    );

    let (recorder, report) = record(&schema, GenerateOptions::default());
    assert_eq!(recorder.element_names(), ["node", "label"]);
    assert_eq!(report.emitted.elements, 2);
}

#[test]
fn required_recursion_is_copied_once() {
    let node_type = element_content(
        "NodeType",
        Particle::sequence(vec![
            Particle::element(typed("label", "string")),
            Particle::element_ref(QName::local("node")),
        ]),
    );
    let schema = schema_with(
        vec![with_type("node", "NodeType")],
        vec![TypeDefinition::Complex(node_type)],
    );

    let (recorder, _) = record(&schema, GenerateOptions::default());
    assert_eq!(recorder.element_names(), ["node", "label", "node", "label"]);
    // The copy shares its value generators with the original.
    assert_eq!(recorder.texts_of("label"), ["label1", "label2"]);
}

#[test]
fn all_groups_keep_declaration_order() {
    let card = element_content(
        "CardType",
        Particle::all(vec![
            Particle::element(typed("b", "string")),
            Particle::element(typed("a", "string")),
            Particle::element(typed("c", "string")),
        ]),
    );
    let schema = schema_with(
        vec![with_type("card", "CardType")],
        vec![TypeDefinition::Complex(card)],
    );

    let (recorder, _) = record(&schema, GenerateOptions::default());
    assert_eq!(recorder.element_names(), ["card", "b", "a", "c"]);
}

#[test]
fn repeated_choice_rotates_through_branches() {
    let shape = element_content(
        "ShapeType",
        Particle::choice(vec![
            Particle::element(typed("circle", "string")),
            Particle::element(typed("square", "string")),
            Particle::element(typed("triangle", "string")),
        ])
        .with_occurs(1, Occurs::Bounded(5)),
    );
    let schema = schema_with(
        vec![with_type("shape", "ShapeType")],
        vec![TypeDefinition::Complex(shape)],
    );

    let (recorder, _) = record(&schema, GenerateOptions::default());
    assert_eq!(
        recorder.element_names(),
        ["shape", "circle", "square", "triangle", "circle", "square"]
    );
}

#[test]
fn abstract_head_is_replaced_by_substitution_members() {
    let drawing = element_content(
        "DrawingType",
        Particle::sequence(vec![
            Particle::element_ref(QName::local("shape")).with_occurs(1, Occurs::Bounded(2)),
        ]),
    );
    let mut head = ElementDecl::new(QName::local("shape"), None);
    head.is_abstract = true;
    let mut circle = typed("circle", "string");
    circle.substitution_group = Some(QName::local("shape"));
    let mut square = typed("square", "string");
    square.substitution_group = Some(QName::local("shape"));

    let schema = schema_with(
        vec![with_type("drawing", "DrawingType"), head, circle, square],
        vec![TypeDefinition::Complex(drawing)],
    );

    let (recorder, _) = record(&schema, GenerateOptions::default());
    assert_eq!(recorder.element_names(), ["drawing", "circle", "square"]);
}

#[test]
fn nillable_elements_alternate_with_values() {
    let mut entry = typed("entry", "string");
    entry.nillable = true;
    let list = element_content(
        "ListType",
        Particle::sequence(vec![Particle::element(entry).with_occurs(1, Occurs::Bounded(4))]),
    );
    let schema = schema_with(
        vec![with_type("list", "ListType")],
        vec![TypeDefinition::Complex(list)],
    );

    let (recorder, report) = record(&schema, GenerateOptions::default());
    assert_eq!(recorder.element_names().len(), 5);
    assert_eq!(recorder.attribute_values("nil"), ["true", "true"]);
    assert_eq!(recorder.texts_of("entry"), ["entry1", "entry2"]);
    assert_eq!(report.emitted.nil_elements, 2);
}

#[test]
fn unmatched_strict_wildcard_leaves_a_comment() {
    let envelope = element_content(
        "EnvelopeType",
        Particle::sequence(vec![Particle::any(Wildcard::new(
            NamespaceConstraint::List(vec!["urn:missing".to_string()]),
            ProcessContents::Strict,
        ))]),
    );
    let schema = schema_with(
        vec![with_type("envelope", "EnvelopeType")],
        vec![TypeDefinition::Complex(envelope)],
    );

    let (recorder, report) = record(&schema, GenerateOptions::default());
    assert_eq!(recorder.element_names(), ["envelope"]);
    assert_eq!(
        recorder.comments(),
        ["Could not find element for any with namespace urn:missing"]
    );
    assert_eq!(report.warnings_by_code.get("unmatched_wildcard"), Some(&1));
}

#[test]
fn lax_wildcard_gets_a_placeholder_element() {
    let envelope = element_content(
        "EnvelopeType",
        Particle::sequence(vec![Particle::any(Wildcard::new(
            NamespaceConstraint::Any,
            ProcessContents::Lax,
        ))]),
    );
    let schema = schema_with(
        vec![with_type("envelope", "EnvelopeType")],
        vec![TypeDefinition::Complex(envelope)],
    );

    let (recorder, _) = record(&schema, GenerateOptions::default());
    assert_eq!(recorder.element_names(), ["envelope", "any_element"]);
    assert_eq!(recorder.texts_of("any_element"), ["any_element1"]);
}

#[test]
fn strict_wildcard_picks_a_declared_element() {
    let envelope = element_content(
        "EnvelopeType",
        Particle::sequence(vec![Particle::any(Wildcard::new(
            NamespaceConstraint::Any,
            ProcessContents::Strict,
        ))]),
    );
    let schema = schema_with(
        vec![with_type("envelope", "EnvelopeType"), typed("payload", "int")],
        vec![TypeDefinition::Complex(envelope)],
    );

    let (recorder, _) = record(&schema, GenerateOptions::default());
    assert_eq!(recorder.element_names(), ["envelope", "payload"]);
    assert_eq!(recorder.texts_of("payload"), ["1"]);
}

#[test]
fn abstract_type_is_tagged_with_its_concrete_derivation() {
    let mut vehicle = element_content(
        "Vehicle",
        Particle::sequence(vec![Particle::element(typed("make", "string"))]),
    );
    vehicle.is_abstract = true;
    let mut car = element_content(
        "Car",
        Particle::sequence(vec![
            Particle::element(typed("make", "string")),
            Particle::element(typed("doors", "int")),
        ]),
    );
    car.base = Some(QName::local("Vehicle"));
    car.derivation = Derivation::Extension;

    let schema = schema_with(
        vec![with_type("garage", "Vehicle")],
        vec![TypeDefinition::Complex(vehicle), TypeDefinition::Complex(car)],
    );

    let (recorder, _) = record(&schema, GenerateOptions::default());
    assert_eq!(
        recorder.events()[2],
        DocumentEvent::DerivedType(QName::local("Car"))
    );
    assert_eq!(recorder.element_names(), ["garage", "make", "doors"]);
}

#[test]
fn attributes_use_fixed_then_default_then_generated_values() {
    let mut code = AttributeDecl::new(QName::local("code"), Some(QName::xs("string")));
    code.fixed = Some("X1".to_string());
    let mut unit = AttributeDecl::new(QName::local("unit"), Some(QName::xs("string")));
    unit.default = Some("kg".to_string());
    let count = AttributeDecl::new(QName::local("count"), Some(QName::xs("int")));

    let mut item = ComplexTypeDef::new(QName::local("ItemType"), ContentType::Empty);
    item.attributes = vec![required(code), required(unit), required(count)];
    let holder = element_content(
        "HolderType",
        Particle::sequence(vec![
            Particle::element(with_type("item", "ItemType")).with_occurs(1, Occurs::Bounded(2)),
        ]),
    );

    let schema = schema_with(
        vec![with_type("holder", "HolderType")],
        vec![TypeDefinition::Complex(holder), TypeDefinition::Complex(item)],
    );

    let (recorder, report) = record(&schema, GenerateOptions::default());
    assert_eq!(recorder.attribute_values("code"), ["X1", "X1"]);
    assert_eq!(recorder.attribute_values("unit"), ["kg", "unit1"]);
    assert_eq!(recorder.attribute_values("count"), ["1", "-2147483648"]);
    assert_eq!(report.emitted.attributes, 6);
}

#[test]
fn mixed_content_gets_a_text_token() {
    let mut paragraph = element_content(
        "ParagraphType",
        Particle::sequence(vec![Particle::element(typed("b", "string"))]),
    );
    paragraph.mixed = true;
    let schema = schema_with(
        vec![with_type("p", "ParagraphType")],
        vec![TypeDefinition::Complex(paragraph)],
    );

    let (recorder, _) = record(&schema, GenerateOptions::default());
    assert_eq!(recorder.texts_of("p"), ["text"]);
    assert_eq!(recorder.texts_of("b"), ["b1"]);
}

#[test]
fn repetition_cap_bounds_unbounded_particles() {
    let qty = SimpleTypeDef {
        name: QName::new("Qty", "urn:shop"),
        base: None,
        variety: SimpleVariety::Atomic {
            primitive: Builtin::PositiveInteger,
        },
        facets: Facets {
            max_inclusive: Some("3".to_string()),
            ..Facets::default()
        },
    };
    let order = ComplexTypeDef::new(
        QName::new("OrderType", "urn:shop"),
        ContentType::Elements {
            particle: Particle::sequence(vec![
                Particle::element(ElementDecl::new(
                    QName::new("qty", "urn:shop"),
                    Some(QName::new("Qty", "urn:shop")),
                ))
                .with_occurs(1, Occurs::Unbounded),
                Particle::element(ElementDecl::new(
                    QName::new("note", "urn:shop"),
                    Some(QName::xs("string")),
                ))
                .with_occurs(0, Occurs::Unbounded),
            ]),
        },
    );
    let schema = schema_with(
        vec![ElementDecl::new(
            QName::new("order", "urn:shop"),
            Some(QName::new("OrderType", "urn:shop")),
        )],
        vec![TypeDefinition::Simple(qty), TypeDefinition::Complex(order)],
    );
    let options = GenerateOptions {
        repetition_cap: 2,
        ..GenerateOptions::default()
    };

    let (xml, report) = GenerationEngine::new(options)
        .generate_string(&schema)
        .expect("generate document");

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("<order xmlns=\"urn:shop\">"));
    assert!(xml.contains("<qty>1</qty>"));
    assert!(xml.contains("<qty>3</qty>"));
    assert!(xml.contains("<note>note1</note>"));
    assert!(xml.contains("<note>note2</note>"));
    assert_eq!(report.generator_usage.get("integer"), Some(&2));
    assert_eq!(report.generator_usage.get("text"), Some(&2));
    assert_eq!(report.bytes_written, xml.len() as u64);
    assert_eq!(report.root, Some(QName::new("order", "urn:shop")));
}

#[test]
fn explicit_root_element_is_honoured() {
    let schema = schema_with(vec![typed("first", "string"), typed("second", "int")], vec![]);
    let options = GenerateOptions {
        root_element: Some(QName::local("second")),
        ..GenerateOptions::default()
    };

    let (recorder, _) = record(&schema, options);
    assert_eq!(recorder.element_names(), ["second"]);
    assert_eq!(recorder.texts_of("second"), ["1"]);
}

#[test]
fn missing_root_yields_a_diagnostic_document() {
    let mut shape = ElementDecl::new(QName::local("shape"), None);
    shape.is_abstract = true;
    let schema = schema_with(vec![shape], vec![]);

    let mut recorder = EventRecorder::new();
    let err = GenerationEngine::default()
        .run(&schema, &mut recorder)
        .expect_err("no concrete root");
    assert!(matches!(err, GenerationError::NoRootElement));
    assert_eq!(
        recorder.comments(),
        ["No usable root element found in the schema set"]
    );
    assert!(recorder.element_names().is_empty());
}

#[test]
fn empty_schema_is_rejected() {
    let schema = CompiledSchema::new("0.1");
    let mut recorder = EventRecorder::new();
    let err = GenerationEngine::default()
        .run(&schema, &mut recorder)
        .expect_err("empty schema");
    assert!(matches!(err, GenerationError::InvalidConfig(_)));
    assert!(recorder.events().is_empty());
}

#[test]
fn unresolved_references_are_skipped_with_a_warning() {
    let holder = element_content(
        "HolderType",
        Particle::sequence(vec![
            Particle::element_ref(QName::local("ghost")),
            Particle::element(typed("kept", "string")),
        ]),
    );
    let schema = schema_with(
        vec![with_type("holder", "HolderType")],
        vec![TypeDefinition::Complex(holder)],
    );

    let (recorder, report) = record(&schema, GenerateOptions::default());
    assert_eq!(recorder.element_names(), ["holder", "kept"]);
    assert!(report.warnings_by_code.contains_key("unresolved_element"));
}

/// Envelope in `urn:env` whose content is a single wildcard, next to a
/// no-namespace `stamp` and a foreign `token`.
fn envelope_schema(namespace: NamespaceConstraint, process_contents: ProcessContents) -> CompiledSchema {
    let mut wildcard = Wildcard::new(namespace, process_contents);
    wildcard.schema_namespace = "urn:env".to_string();
    let envelope = ComplexTypeDef::new(
        QName::new("EnvelopeType", "urn:env"),
        ContentType::Elements {
            particle: Particle::sequence(vec![Particle::any(wildcard)]),
        },
    );
    schema_with(
        vec![
            ElementDecl::new(
                QName::new("envelope", "urn:env"),
                Some(QName::new("EnvelopeType", "urn:env")),
            ),
            typed("stamp", "string"),
            ElementDecl::new(QName::new("token", "urn:ext"), Some(QName::xs("int"))),
        ],
        vec![TypeDefinition::Complex(envelope)],
    )
}

#[test]
fn strict_other_wildcard_picks_a_foreign_element() {
    let schema = envelope_schema(NamespaceConstraint::Other, ProcessContents::Strict);

    let (recorder, report) = record(&schema, GenerateOptions::default());
    assert_eq!(recorder.element_names(), ["envelope", "token"]);
    assert_eq!(recorder.texts_of("token"), ["1"]);
    assert!(report.warnings.is_empty());
}

#[test]
fn lax_other_wildcard_uses_the_placeholder_namespace() {
    let schema = envelope_schema(NamespaceConstraint::Other, ProcessContents::Lax);

    let (recorder, _) = record(&schema, GenerateOptions::default());
    assert!(
        recorder
            .events()
            .contains(&DocumentEvent::StartElement(QName::new("any_element", OTHER_NAMESPACE)))
    );
    assert_eq!(recorder.texts_of("any_element"), ["any_element1"]);
}

#[test]
fn strict_local_wildcard_picks_an_unqualified_element() {
    let schema = envelope_schema(NamespaceConstraint::Local, ProcessContents::Strict);

    let (recorder, _) = record(&schema, GenerateOptions::default());
    assert_eq!(recorder.element_names(), ["envelope", "stamp"]);
    assert_eq!(recorder.texts_of("stamp"), ["stamp1"]);
}

fn tagged_schema(wildcard: Wildcard, attributes: Vec<AttributeDecl>) -> CompiledSchema {
    let mut tag = ComplexTypeDef::new(QName::local("TagType"), ContentType::Empty);
    tag.attribute_wildcard = Some(wildcard);
    let mut schema = schema_with(
        vec![with_type("tag", "TagType")],
        vec![TypeDefinition::Complex(tag)],
    );
    schema.attributes = attributes;
    schema
}

#[test]
fn lax_attribute_wildcard_gets_a_placeholder_attribute() {
    let schema = tagged_schema(
        Wildcard::new(NamespaceConstraint::Any, ProcessContents::Lax),
        Vec::new(),
    );

    let (recorder, report) = record(&schema, GenerateOptions::default());
    assert_eq!(recorder.attribute_values("any_attr"), ["any_attr1"]);
    assert_eq!(report.emitted.attributes, 1);
}

#[test]
fn strict_attribute_wildcard_picks_a_declared_attribute() {
    let schema = tagged_schema(
        Wildcard::new(NamespaceConstraint::Any, ProcessContents::Strict),
        vec![AttributeDecl::new(QName::local("lang"), Some(QName::xs("string")))],
    );

    let (recorder, _) = record(&schema, GenerateOptions::default());
    assert_eq!(recorder.attribute_values("lang"), ["lang1"]);
    assert!(recorder.attribute_values("any_attr").is_empty());
}

#[test]
fn unmatched_strict_attribute_wildcard_leaves_a_comment() {
    let schema = tagged_schema(
        Wildcard::new(
            NamespaceConstraint::List(vec!["urn:nothing".to_string()]),
            ProcessContents::Strict,
        ),
        vec![AttributeDecl::new(QName::local("lang"), Some(QName::xs("string")))],
    );

    let (recorder, report) = record(&schema, GenerateOptions::default());
    assert!(recorder.attribute_values("lang").is_empty());
    assert_eq!(
        recorder.comments(),
        ["Could not find attribute for anyAttribute with namespace urn:nothing"]
    );
    assert_eq!(
        report.warnings_by_code.get("unmatched_attribute_wildcard"),
        Some(&1)
    );
}

#[test]
fn attribute_records_keep_use_and_form() {
    let mut code = AttributeDecl::new(QName::new("code", "urn:shop"), Some(QName::xs("string")));
    code.form = Form::Qualified;
    let note = AttributeDecl::new(QName::local("note"), Some(QName::xs("string")));
    let legacy = AttributeDecl::new(QName::local("legacy"), Some(QName::xs("string")));

    let mut item = ComplexTypeDef::new(QName::local("ItemType"), ContentType::Empty);
    item.attributes = vec![
        required(code),
        AttributeUse {
            attribute: note,
            usage: AttributeUsage::Optional,
        },
        AttributeUse {
            attribute: legacy,
            usage: AttributeUsage::Prohibited,
        },
    ];
    let schema = schema_with(
        vec![with_type("item", "ItemType")],
        vec![TypeDefinition::Complex(item)],
    );

    let index = SchemaIndex::new(&schema);
    let output = InstanceTreeBuilder::new(&index, &GenerateOptions::default(), IdRegistry::shared())
        .build()
        .expect("build instance tree");
    let root = output.tree.root().expect("root node");
    let records: Vec<(&str, AttributeUsage, Form)> = output
        .tree
        .element(root)
        .expect("root element")
        .attributes
        .iter()
        .map(|attribute| (attribute.name.name.as_str(), attribute.usage, attribute.form))
        .collect();
    assert_eq!(
        records,
        [
            ("code", AttributeUsage::Required, Form::Qualified),
            ("note", AttributeUsage::Optional, Form::Unqualified),
            ("legacy", AttributeUsage::Prohibited, Form::Unqualified),
        ]
    );

    let (recorder, report) = record(&schema, GenerateOptions::default());
    assert_eq!(recorder.attribute_values("code"), ["code1"]);
    assert_eq!(recorder.attribute_values("note"), ["note1"]);
    assert!(recorder.attribute_values("legacy").is_empty());
    assert_eq!(report.emitted.attributes, 2);
}

#[test]
fn elements_already_open_are_not_emitted_again() {
    let mut tree = InstanceTree::new();
    let root = tree.add_element(InstanceElement::new(QName::local("node"), 1));
    tree.set_root(root);
    let group = tree.add_group(InstanceGroup::new(1, false));
    tree.append_child(root, group);
    tree.append_child(group, root);
    let label = tree.add_element(InstanceElement::new(QName::local("label"), 2));
    tree.append_child(group, label);

    let mut recorder = EventRecorder::new();
    let summary = InstanceTreeEmitter::new(&mut tree)
        .emit(&mut recorder)
        .expect("emit document");

    assert_eq!(recorder.element_names(), ["node", "label", "label"]);
    assert_eq!(summary.stats.skipped_reentrant, 1);
    assert_eq!(summary.stats.elements, 3);
}
