//! End-to-end scenarios: schema text in, generated C++ buffers out.

use std::path::PathBuf;

use cpacsgen::fs::Filesystem;
use cpacsgen::tables::{MappingTable, Table, Tables};
use cpacsgen::{build_type_system, generate_code, parse_schema_str, GeneratorOptions};

fn generate(schema: &str, tables: &Tables) -> Filesystem {
    let parsed = parse_schema_str(schema).unwrap();
    let types = build_type_system(parsed, tables).unwrap();
    let mut fs = Filesystem::new();
    generate_code(
        PathBuf::from("out").as_path(),
        &types,
        "",
        tables,
        &GeneratorOptions::default(),
        &mut fs,
    )
    .unwrap();
    fs
}

fn content<'a>(fs: &'a Filesystem, name: &str) -> &'a str {
    fs.files()
        .find(|f| f.path().file_name().is_some_and(|n| n == name))
        .unwrap_or_else(|| panic!("missing generated file {name}"))
        .content()
}

fn uid_ref_tables() -> Tables {
    let mut tables = Tables::default();
    tables.type_substitutions =
        MappingTable::from_data([("stringUIDBaseType", "std::string")]);
    tables
}

#[test]
fn sequence_generates_fields_in_declaration_order() {
    let fs = generate(
        r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="mixedType">
        <xsd:sequence>
            <xsd:element name="a" type="xsd:double"/>
            <xsd:element name="b" type="xsd:string" minOccurs="0"/>
            <xsd:element name="c" type="xsd:int" minOccurs="0" maxOccurs="unbounded"/>
            <xsd:element name="d" type="xsd:boolean"/>
            <xsd:element name="e" type="xsd:double" minOccurs="0"/>
            <xsd:element name="f" type="xsd:string" maxOccurs="10"/>
            <xsd:element name="g" type="xsd:dateTime"/>
            <xsd:element name="h" type="xsd:integer" minOccurs="0"/>
            <xsd:element name="i" type="xsd:string"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:element name="mixed" type="mixedType"/>
</xsd:schema>"#,
        &Tables::default(),
    );

    let hpp = content(&fs, "CPACSMixed.h");
    let cpp = content(&fs, "CPACSMixed.cpp");

    // all nine fields, in declaration order
    let field_names = [
        "m_a;", "m_b;", "m_cs;", "m_d;", "m_e;", "m_fs;", "m_g;", "m_h;", "m_i;",
    ];
    let mut last = 0;
    for name in field_names {
        let pos = hpp[last..]
            .find(name)
            .unwrap_or_else(|| panic!("field {name} missing or out of order"));
        last += pos;
    }

    assert!(hpp.contains("boost::optional<std::string>"));
    assert!(hpp.contains("std::vector<int32_t>"));
    assert!(hpp.contains("std::time_t"));

    // missing mandatory nodes are logged, reading continues
    assert!(cpp.contains("LOG(ERROR) << \"Required element a is missing at xpath \" << xpath;"));
    assert!(cpp.contains("LOG(ERROR) << \"Required element i is missing at xpath \" << xpath;"));

    // the write body respects child order
    assert!(cpp.contains(
        "const std::vector<std::string> childElemOrder = { \"a\", \"b\", \"c\", \"d\", \"e\", \"f\", \"g\", \"h\", \"i\" };"
    ));
    assert!(cpp.contains("TixiCreateSequenceElementIfNotExists"));

    // optional fields are removed when absent, writing is idempotent
    assert!(cpp.contains("tixi::TixiRemoveElement(tixiHandle, xpath + \"/b\");"));
}

#[test]
fn choice_generates_postfixed_optionals_and_validator() {
    let fs = generate(
        r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="eitherType">
        <xsd:sequence>
            <xsd:choice>
                <xsd:element name="left" type="xsd:string"/>
                <xsd:element name="right" type="xsd:string"/>
            </xsd:choice>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:element name="either" type="eitherType"/>
</xsd:schema>"#,
        &Tables::default(),
    );

    let hpp = content(&fs, "CPACSEither.h");
    let cpp = content(&fs, "CPACSEither.cpp");

    assert!(hpp.contains("boost::optional<std::string> m_left_choice1;"));
    assert!(hpp.contains("boost::optional<std::string> m_right_choice2;"));
    assert!(hpp.contains("TIGL_EXPORT bool ValidateChoices() const;"));

    assert!(cpp.contains("bool CPACSEither::ValidateChoices() const"));
    assert!(cpp.contains("m_left_choice1.is_initialized()"));
    assert!(cpp.contains("m_right_choice2.is_initialized()"));
    assert!(cpp.contains("== 1"));
    // a mandatory choice does not accept the all-absent case
    assert!(!cpp.contains("all uninitialized is valid"));

    // the validator runs at the end of ReadCPACS
    assert!(cpp.contains("if (!ValidateChoices()) {"));
    assert!(cpp.contains("LOG(ERROR) << \"Invalid choice configuration at xpath \" << xpath;"));
}

#[test]
fn optional_choice_accepts_no_selection() {
    let fs = generate(
        r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="eitherType">
        <xsd:sequence>
            <xsd:choice minOccurs="0">
                <xsd:element name="left" type="xsd:string"/>
                <xsd:element name="right" type="xsd:string"/>
            </xsd:choice>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:element name="either" type="eitherType"/>
</xsd:schema>"#,
        &Tables::default(),
    );

    let cpp = content(&fs, "CPACSEither.cpp");
    assert!(cpp.contains("// all uninitialized is valid since choice is optional!"));
    assert!(cpp.contains("== 1"));
}

#[test]
fn equal_enums_collapse_to_one_emitted_enum() {
    let fs = generate(
        r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="aType">
        <xsd:sequence>
            <xsd:element name="mode">
                <xsd:simpleType>
                    <xsd:restriction base="xsd:string">
                        <xsd:enumeration value="on"/>
                        <xsd:enumeration value="off"/>
                    </xsd:restriction>
                </xsd:simpleType>
            </xsd:element>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:complexType name="bType">
        <xsd:sequence>
            <xsd:element name="mode">
                <xsd:simpleType>
                    <xsd:restriction base="xsd:string">
                        <xsd:enumeration value="on"/>
                        <xsd:enumeration value="off"/>
                    </xsd:restriction>
                </xsd:simpleType>
            </xsd:element>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:complexType name="rootType">
        <xsd:sequence>
            <xsd:element name="a" type="aType"/>
            <xsd:element name="b" type="bType"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:element name="root" type="rootType"/>
</xsd:schema>"#,
        &Tables::default(),
    );

    let enum_files: Vec<_> = fs
        .files()
        .filter(|f| f.content().contains("inline std::string CPACS"))
        .collect();
    assert_eq!(enum_files.len(), 1);

    let hpp = content(&fs, "CPACSMode.h");
    assert!(hpp.contains("enum CPACSMode"));
    assert!(hpp.contains("inline std::string CPACSModeToString(const CPACSMode& value)"));

    // both referring classes use the collapsed enum
    for class_file in ["CPACSA.cpp", "CPACSB.cpp"] {
        let cpp = content(&fs, class_file);
        assert!(cpp.contains("stringToCPACSMode"));
        assert!(cpp.contains("CPACSModeToString"));
    }
}

#[test]
fn simple_content_with_attributes_becomes_wrapper_class() {
    let fs = generate(
        r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="valueType">
        <xsd:simpleContent>
            <xsd:extension base="xsd:string">
                <xsd:attribute name="unit" type="xsd:string" use="required"/>
                <xsd:attribute name="comment" type="xsd:string"/>
            </xsd:extension>
        </xsd:simpleContent>
    </xsd:complexType>
    <xsd:complexType name="rootType">
        <xsd:sequence>
            <xsd:element name="value" type="valueType"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:element name="root" type="rootType"/>
</xsd:schema>"#,
        &Tables::default(),
    );

    let hpp = content(&fs, "CPACSValue.h");
    let cpp = content(&fs, "CPACSValue.cpp");

    assert!(hpp.contains("m_simpleContent;"));
    assert!(hpp.contains("m_unit;"));
    assert!(hpp.contains("boost::optional<std::string>"));

    // simple content reads the class element itself, attributes read by name
    assert!(cpp.contains(
        "m_simpleContent = tixi::TixiGetElement<std::string>(tixiHandle, xpath);"
    ));
    assert!(cpp.contains(
        "m_unit = tixi::TixiGetAttribute<std::string>(tixiHandle, xpath, \"unit\");"
    ));
    assert!(cpp.contains("tixi::TixiSaveAttribute(tixiHandle, xpath, \"unit\", m_unit);"));
}

#[test]
fn uid_reference_vector_gets_add_remove_and_notify() {
    let fs = generate(
        r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="linkedType">
        <xsd:sequence>
            <xsd:element name="ref" type="stringUIDBaseType" minOccurs="0" maxOccurs="unbounded"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:element name="linked" type="linkedType"/>
</xsd:schema>"#,
        &uid_ref_tables(),
    );

    let hpp = content(&fs, "CPACSLinked.h");
    let cpp = content(&fs, "CPACSLinked.cpp");

    assert!(hpp.contains("TIGL_EXPORT virtual void AddToRefs(const std::string& value);"));
    assert!(hpp.contains("TIGL_EXPORT virtual bool RemoveFromRefs(const std::string& value);"));
    assert!(hpp.contains("public ITiglUIDRefObject"));
    assert!(hpp.contains("CTiglUIDManager* m_uidMgr;"));

    // references register on read
    assert!(cpp.contains("m_uidMgr->RegisterReference(*it, *this);"));
    // and every matching entry is rewritten on a uid rename
    assert!(cpp.contains("void CPACSLinked::NotifyUIDChange(const std::string& oldUid, const std::string& newUid)"));
    assert!(cpp.contains("for (auto& entry : m_refs) {"));
    assert!(cpp.contains("entry = newUid;"));
    // and unregister on destruction
    assert!(cpp.contains("m_uidMgr->TryUnregisterReference(*it, *this);"));
}

#[test]
fn uid_field_registers_object_and_parents_get_ctors() {
    let mut tables = Tables::default();
    tables.parent_pointers = Table::from_data(["CPACSChild"]);

    let fs = generate(
        r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="childType">
        <xsd:sequence>
            <xsd:element name="value" type="xsd:double"/>
        </xsd:sequence>
        <xsd:attribute name="uID" type="xsd:ID" use="required"/>
    </xsd:complexType>
    <xsd:complexType name="leftType">
        <xsd:sequence>
            <xsd:element name="child" type="childType"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:complexType name="rightType">
        <xsd:sequence>
            <xsd:element name="child" type="childType" minOccurs="0"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:complexType name="rootType">
        <xsd:sequence>
            <xsd:element name="left" type="leftType"/>
            <xsd:element name="right" type="rightType"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:element name="root" type="rootType"/>
</xsd:schema>"#,
        &tables,
    );

    let hpp = content(&fs, "CPACSChild.h");
    let cpp = content(&fs, "CPACSChild.cpp");

    // one constructor per possible parent
    assert!(hpp.contains("TIGL_EXPORT CPACSChild(CPACSLeft* parent, CTiglUIDManager* uidMgr);"));
    assert!(hpp.contains("TIGL_EXPORT CPACSChild(CPACSRight* parent, CTiglUIDManager* uidMgr);"));
    // multiple parents make the getter a constrained template
    assert!(hpp.contains("template<typename P>"));
    assert!(hpp.contains(
        "static_assert(std::is_same<P, CPACSLeft>::value || std::is_same<P, CPACSRight>::value, \"template argument for P is not a parent class of CPACSChild\");"
    ));
    assert!(hpp.contains("void* m_parent;"));
    assert!(hpp.contains("const std::type_info* m_parentType;"));
    assert!(hpp.contains("public CTiglReqUIDObject"));

    // uid registration on read and unregistration on destruction
    assert!(cpp.contains("if (m_uidMgr && !m_uID.empty()) m_uidMgr->RegisterObject(m_uID, *this);"));
    assert!(cpp.contains("if (m_uidMgr) m_uidMgr->TryUnregisterObject(m_uID);"));
    // rename support through the setter
    assert!(cpp.contains("m_uidMgr->UpdateObjectUID(m_uID, value);"));
}

#[test]
fn optional_class_reads_are_guarded() {
    let fs = generate(
        r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="innerType">
        <xsd:sequence>
            <xsd:element name="value" type="xsd:double"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:complexType name="outerType">
        <xsd:sequence>
            <xsd:element name="inner" type="innerType" minOccurs="0"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:element name="outer" type="outerType"/>
</xsd:schema>"#,
        &Tables::default(),
    );

    let cpp = content(&fs, "CPACSOuter.cpp");
    assert!(cpp.contains("m_inner = boost::in_place();"));
    assert!(cpp.contains("} catch(const std::exception& e) {"));
    assert!(cpp.contains("LOG(ERROR) << \"Failed to read inner at xpath \" << xpath << \": \" << e.what();"));
    assert!(cpp.contains("m_inner = boost::none;"));

    // optional class fields get get-or-create and remove manipulators
    let hpp = content(&fs, "CPACSOuter.h");
    assert!(hpp.contains("TIGL_EXPORT virtual CPACSInner& GetInner(CreateIfNotExistsTag);"));
    assert!(hpp.contains("TIGL_EXPORT virtual void RemoveInner();"));
}

#[test]
fn class_vectors_get_add_remove_manipulators_and_forwards() {
    let fs = generate(
        r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="itemType">
        <xsd:sequence>
            <xsd:element name="value" type="xsd:double"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:complexType name="listType">
        <xsd:sequence>
            <xsd:element name="item" type="itemType" maxOccurs="unbounded"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:element name="list" type="listType"/>
</xsd:schema>"#,
        &Tables::default(),
    );

    let hpp = content(&fs, "CPACSList.h");
    let cpp = content(&fs, "CPACSList.cpp");

    // vector class fields are forward declared in the header only
    assert!(hpp.contains("class CPACSItem;"));
    assert!(!hpp.contains("#include \"CPACSItem.h\""));
    assert!(cpp.contains("#include \"CPACSItem.h\""));

    assert!(hpp.contains("std::vector<std::unique_ptr<CPACSItem>> m_items;"));
    assert!(hpp.contains("TIGL_EXPORT virtual CPACSItem& AddItem();"));
    assert!(hpp.contains("TIGL_EXPORT virtual void RemoveItem(CPACSItem& ref);"));
    assert!(cpp.contains("m_items.push_back(make_unique<CPACSItem>());"));
    assert!(cpp.contains("tixi::TixiReadElements(tixiHandle, xpath + \"/item\", m_items, 1, tixi::xsdUnbounded);"));
}

#[test]
fn enum_values_are_mangled_into_identifiers() {
    let fs = generate(
        r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:simpleType name="modeType">
        <xsd:restriction base="xsd:string">
            <xsd:enumeration value="-1"/>
            <xsd:enumeration value="1a"/>
            <xsd:enumeration value="double"/>
            <xsd:enumeration value="mach hold"/>
        </xsd:restriction>
    </xsd:simpleType>
    <xsd:complexType name="rootType">
        <xsd:sequence>
            <xsd:element name="mode" type="modeType"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:element name="root" type="rootType"/>
</xsd:schema>"#,
        &Tables::default(),
    );

    let hpp = content(&fs, "CPACSMode.h");
    assert!(hpp.contains("enum CPACSMode"));
    assert!(hpp.contains("_neg1,"));
    assert!(hpp.contains("_1a,"));
    // reserved identifiers get an underscore prefix
    assert!(hpp.contains("_double,"));
    assert!(hpp.contains("mach_hold"));

    // toString returns the original cpacs strings
    assert!(hpp.contains("case _neg1: return \"-1\";"));
    assert!(hpp.contains("case mach_hold: return \"mach hold\";"));

    // fromString compares case-insensitively and throws on unknown input
    assert!(hpp.contains("if (toLower(value) == \"mach hold\") { return mach_hold; }"));
    assert!(hpp.contains("throw CTiglError(\"Invalid string value"));

    // the alias export and usage in the referring class
    assert!(hpp.contains("using ECPACSMode = generated::CPACSMode;"));
    let cpp = content(&fs, "CPACSRoot.cpp");
    assert!(cpp.contains("m_mode = stringToCPACSMode(tixi::TixiGetElement<std::string>(tixiHandle, xpath + \"/mode\"));"));
}

#[test]
fn generation_is_deterministic() {
    let schema = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="aType">
        <xsd:sequence>
            <xsd:element name="x" type="xsd:double"/>
            <xsd:element name="mode">
                <xsd:simpleType>
                    <xsd:restriction base="xsd:string">
                        <xsd:enumeration value="auto"/>
                        <xsd:enumeration value="manual"/>
                    </xsd:restriction>
                </xsd:simpleType>
            </xsd:element>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:complexType name="rootType">
        <xsd:sequence>
            <xsd:element name="a" type="aType" maxOccurs="unbounded"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:element name="root" type="rootType"/>
</xsd:schema>"#;

    let merge = |mut fs: Filesystem| -> String {
        fs.merge_files_into(PathBuf::from("merged.cpp"));
        fs.files()
            .find(|f| f.path().file_name().is_some_and(|n| n == "merged.cpp"))
            .unwrap()
            .content()
            .to_owned()
    };

    let first = merge(generate(schema, &Tables::default()));
    let second = merge(generate(schema, &Tables::default()));
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn pruned_types_are_not_emitted() {
    let mut tables = Tables::default();
    tables.prune_list = Table::from_data(["CPACSUnwanted"]);

    let fs = generate(
        r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="unwantedType">
        <xsd:sequence>
            <xsd:element name="value" type="xsd:double"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:complexType name="rootType">
        <xsd:sequence>
            <xsd:element name="unwanted" type="unwantedType" minOccurs="0"/>
            <xsd:element name="kept" type="xsd:string"/>
        </xsd:sequence>
    </xsd:complexType>
    <xsd:element name="root" type="rootType"/>
</xsd:schema>"#,
        &tables,
    );

    assert!(fs
        .files()
        .all(|f| !f.path().to_string_lossy().contains("CPACSUnwanted")));
    let hpp = content(&fs, "CPACSRoot.h");
    assert!(!hpp.contains("CPACSUnwanted"));
    assert!(hpp.contains("m_kept;"));
}

#[test]
fn fundamental_base_reads_and_writes_on_own_element() {
    let fs = generate(
        r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:complexType name="taggedType">
        <xsd:complexContent>
            <xsd:extension base="xsd:double">
                <xsd:sequence>
                    <xsd:element name="label" type="xsd:string"/>
                </xsd:sequence>
            </xsd:extension>
        </xsd:complexContent>
    </xsd:complexType>
    <xsd:element name="tagged" type="taggedType"/>
</xsd:schema>"#,
        &Tables::default(),
    );

    let hpp = content(&fs, "CPACSTagged.h");
    let cpp = content(&fs, "CPACSTagged.cpp");

    // first field is the synthesized base
    let base_pos = hpp.find("m_base;").expect("missing base field");
    let label_pos = hpp.find("m_label;").expect("missing label field");
    assert!(base_pos < label_pos);

    // the base value lives on the class element itself
    assert!(cpp.contains("m_base = tixi::TixiGetElement<double>(tixiHandle, xpath);"));
    assert!(cpp.contains("tixi::TixiSaveElement(tixiHandle, xpath, m_base);"));
}
