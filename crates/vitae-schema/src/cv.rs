//! The built-in CV schema and its themes.

use crate::types::{
    ArraySchema, BaseSchema, CrossFieldRule, NumberSchema, ObjectSchema, Property, PropertyOverride,
    Schema, StringFormat, StringSchema, VariantKey,
};

/// Theme names, in presentation order. The first is the default.
pub const THEMES: [&str; 4] = ["classic", "moderncv", "sb2nov", "engineeringresumes"];

pub fn base_schema() -> BaseSchema {
    BaseSchema {
        variants: THEMES.iter().map(|t| VariantKey::new(*t)).collect(),
        default_variant: VariantKey::new(THEMES[0]),
        root: ObjectSchema::new()
            .property("cv", Property::required(cv().into()).describe("The CV content"))
            .property("design", Property::optional(design().into()).describe("Theme and layout settings"))
            .property("locale", Property::optional(locale().into()).describe("Language and date settings")),
    }
}

/// One entry per theme, in [`THEMES`] order.
fn per_theme(property: Property, entries: [PropertyOverride; 4]) -> Property {
    THEMES
        .iter()
        .zip(entries)
        .fold(property, |property, (theme, entry)| property.variant(theme, entry))
}

fn non_empty() -> Schema {
    Schema::String(StringSchema {
        min_length: Some(1),
        ..StringSchema::default()
    })
}

fn cv() -> ObjectSchema {
    ObjectSchema::new()
        .property("name", Property::required(non_empty()).describe("Full name"))
        .property("label", Property::optional(Schema::string()).describe("Headline shown under the name"))
        .property("email", Property::required(Schema::format(StringFormat::Email)))
        .property("phone", Property::optional(Schema::pattern(r"\+?[0-9 ()\-.]{6,20}")))
        .property("location", Property::optional(Schema::string()))
        .property("website", Property::optional(Schema::format(StringFormat::Url)))
        .property(
            "social_networks",
            Property::optional(Schema::array_of(social_network().into())),
        )
        .property(
            "sections",
            Property::optional(ObjectSchema::new().additional(Schema::array_of(entry().into())).into())
                .describe("Section titles mapped to their entries"),
        )
}

fn social_network() -> ObjectSchema {
    ObjectSchema::new()
        .property(
            "network",
            Property::required(Schema::one_of(&[
                "LinkedIn",
                "GitHub",
                "GitLab",
                "Mastodon",
                "ORCID",
                "StackOverflow",
                "X",
            ])),
        )
        .property("username", Property::required(non_empty()))
}

fn entry() -> ObjectSchema {
    let date = || Property::optional(Schema::format(StringFormat::Date));
    let text = || Property::optional(Schema::string());

    ObjectSchema::new()
        .property("company", text())
        .property("institution", text())
        .property("position", text())
        .property("degree", text())
        .property("area", text())
        .property("name", text())
        .property("label", text())
        .property("summary", text())
        .property("location", text())
        .property("url", Property::optional(Schema::format(StringFormat::Url)))
        .property("date", date().describe("A single date, for entries without a span"))
        .property("start_date", date())
        .property("end_date", date().describe("A date, or `present`"))
        .property("highlights", Property::optional(Schema::array_of(Schema::string())))
        .rule(CrossFieldRule::ordered("start_date", "end_date"))
        .rule(CrossFieldRule::exclusive(&["date", "start_date"]))
}

fn design() -> ObjectSchema {
    use PropertyOverride as O;

    let theme = per_theme(
        Property::optional(Schema::one_of(&THEMES)).describe("Theme used to render the CV"),
        THEMES.map(O::default_to),
    );
    let font = per_theme(
        Property::optional(non_empty()),
        [
            O::default_to("Times"),
            O::default_to("Helvetica"),
            O::default_to("New Computer Modern"),
            O::default_to("Source Sans 3"),
        ],
    );
    let page_size = per_theme(
        Property::optional(Schema::one_of(&["a4", "us-letter"])),
        [
            O::default_to("a4"),
            O::default_to("a4"),
            O::default_to("us-letter"),
            O::default_to("us-letter"),
        ],
    );
    let primary_color = per_theme(
        Property::optional(Schema::pattern("#[0-9a-fA-F]{6}")).describe("Accent color as #rrggbb"),
        [
            O::default_to("#004f90"),
            O::default_to("#004f90"),
            O::default_to("#000000"),
            O::default_to("#000000"),
        ],
    );
    let text_alignment = per_theme(
        Property::optional(Schema::one_of(&["left", "justified"])).with_default("justified"),
        [O::inherit(), O::inherit(), O::disabled(), O::default_to("left")],
    );
    let header_separator = per_theme(
        Property::optional(Schema::string()).disabled(),
        [O::inherit(), O::inherit(), O::inherit(), O::enabled_with_default("|")],
    );
    let show_timespan = per_theme(
        Property::optional(Schema::Boolean),
        [
            O::default_to(true),
            O::default_to(true),
            O::default_to(false),
            O::default_to(false),
        ],
    );

    ObjectSchema::new()
        .property("theme", theme)
        .property("font", font)
        .property(
            "font_size",
            Property::optional(Schema::number_between(6.0, 16.0))
                .with_default(10.0)
                .describe("Body font size in points"),
        )
        .property("page_size", page_size)
        .property("primary_color", primary_color)
        .property(
            "page_margin",
            Property::optional(Schema::Number(NumberSchema {
                minimum: Some(0.0),
                maximum: None,
            }))
            .with_default(2.0)
            .describe("Page margin in centimeters"),
        )
        .property("text_alignment", text_alignment)
        .property("header_separator", header_separator)
        .property("show_timespan", show_timespan)
        .property(
            "max_pages",
            Property::optional(Schema::Integer(NumberSchema {
                minimum: Some(1.0),
                maximum: None,
            })),
        )
}

fn locale() -> ObjectSchema {
    ObjectSchema::new()
        .property(
            "language",
            Property::optional(Schema::pattern("[a-z]{2}"))
                .with_default("en")
                .describe("ISO 639-1 language code"),
        )
        .property(
            "present",
            Property::optional(non_empty()).with_default("present"),
        )
        .property(
            "date_style",
            Property::optional(Schema::one_of(&["month_year", "year", "iso"])).with_default("month_year"),
        )
        .property(
            "month_names",
            Property::optional(Schema::Array(ArraySchema {
                items: Box::new(non_empty()),
                min_items: Some(12),
                max_items: Some(12),
            })),
        )
}
