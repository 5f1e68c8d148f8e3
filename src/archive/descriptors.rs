use super::BuildConfig;

const CREATED_BY: &str = concat!("drlforge ", env!("CARGO_PKG_VERSION"));

pub(super) fn manifest(rule_name: &str, config: &BuildConfig, build_time: &str) -> String {
    format!(
        "Manifest-Version: 1.0\n\
         Implementation-Title: {}\n\
         Implementation-Version: {}\n\
         Implementation-Vendor: {}\n\
         Implementation-Description: {}\n\
         Created-By: {}\n\
         Build-Time: {}\n",
        rule_name, config.version, config.vendor, config.description, CREATED_BY, build_time
    )
}

/// `META-INF/kmodule.xml` declaring one knowledge base and session for the package.
pub(super) fn kmodule(rule_name: &str, package_name: &str) -> String {
    let name = escape_xml(rule_name);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<kmodule xmlns="http://www.drools.org/xsd/kmodule">
    <kbase name="{name}KBase" packages="{packages}">
        <ksession name="{name}KSession" />
    </kbase>
</kmodule>
"#,
        name = name,
        packages = escape_xml(package_name)
    )
}

pub(super) fn pom(rule_name: &str, package_name: &str, config: &BuildConfig) -> String {
    let dependencies: String = [
        ("org.drools", "drools-core"),
        ("org.drools", "drools-compiler"),
        ("org.drools", "drools-mvel"),
        ("org.kie", "kie-api"),
    ]
    .iter()
    .map(|(group, artifact)| {
        format!(
            "        <dependency>\n            <groupId>{}</groupId>\n            <artifactId>{}</artifactId>\n            <version>${{drools.version}}</version>\n        </dependency>\n",
            group, artifact
        )
    })
    .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
         xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd">
    <modelVersion>4.0.0</modelVersion>

    <groupId>{group_id}</groupId>
    <artifactId>{artifact_id}</artifactId>
    <version>{version}</version>
    <packaging>jar</packaging>

    <name>{name}</name>
    <description>{description}</description>

    <properties>
        <maven.compiler.source>{java}</maven.compiler.source>
        <maven.compiler.target>{java}</maven.compiler.target>
        <project.build.sourceEncoding>UTF-8</project.build.sourceEncoding>
        <drools.version>{drools}</drools.version>
    </properties>

    <dependencies>
{dependencies}    </dependencies>

    <build>
        <plugins>
            <plugin>
                <groupId>org.apache.maven.plugins</groupId>
                <artifactId>maven-compiler-plugin</artifactId>
                <version>3.11.0</version>
                <configuration>
                    <source>{java}</source>
                    <target>{java}</target>
                </configuration>
            </plugin>
        </plugins>
    </build>
</project>
"#,
        group_id = escape_xml(package_name),
        artifact_id = escape_xml(&super::slug(rule_name)),
        version = escape_xml(&config.version),
        name = escape_xml(rule_name),
        description = escape_xml(&config.description),
        java = escape_xml(&config.java_version),
        drools = escape_xml(&config.drools_version),
        dependencies = dependencies,
    )
}

pub(super) fn escape_xml(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
