//! Profile Document → presentation-ready view models.
//!
//! The HTML views keep nested structures and leave date/markdown formatting to
//! the template helpers. The DOCX view is fully flattened because the
//! placeholder language only knows loops and truthy conditionals.
//!
//! Nothing here fails: missing or oddly-shaped fields become empty strings,
//! empty lists and `false` flags.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use serde_json::Value;

use crate::format::{date_range, format_date, format_location, format_location_compact, DateStyle};
use crate::i18n::{Locale, LABEL_KEYS};
use crate::icons;
use crate::profile::{entries, strings, text, Profile};

trait Positioned {
    fn set_has_more(&mut self, more: bool);
}

fn mark_positions<T: Positioned>(items: &mut [T]) {
    let len = items.len();
    for (i, item) in items.iter_mut().enumerate() {
        item.set_has_more(i + 1 < len);
    }
}

macro_rules! positioned {
    ($($ty:ty),* $(,)?) => {
        $(impl Positioned for $ty {
            fn set_has_more(&mut self, more: bool) {
                self.has_more = more;
            }
        })*
    };
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationView {
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub country_code: String,
    pub region: String,
    /// Pre-joined display string.
    pub display: String,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileLinkView {
    pub network: String,
    pub username: String,
    pub url: String,
    pub icon: String,
    pub has_more: bool,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicsView {
    pub name: String,
    pub label: String,
    pub image: String,
    pub email: String,
    pub phone: String,
    pub url: String,
    pub summary: String,
    pub location: LocationView,
    pub profiles: Vec<ProfileLinkView>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkView {
    pub name: String,
    pub position: String,
    pub url: String,
    pub location: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub summary: String,
    pub highlights: Vec<String>,
    pub repeat_group: bool,
    pub has_more: bool,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerView {
    pub organization: String,
    pub position: String,
    pub url: String,
    pub start_date: String,
    pub end_date: String,
    pub summary: String,
    pub highlights: Vec<String>,
    pub has_more: bool,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationView {
    pub institution: String,
    pub url: String,
    pub area: String,
    pub study_type: String,
    pub start_date: String,
    pub end_date: String,
    pub score: String,
    pub courses: Vec<String>,
    pub repeat_group: bool,
    pub has_more: bool,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardView {
    pub title: String,
    pub date: String,
    pub awarder: String,
    pub summary: String,
    pub has_more: bool,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateView {
    pub name: String,
    pub date: String,
    pub issuer: String,
    pub url: String,
    pub has_more: bool,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationView {
    pub name: String,
    pub publisher: String,
    pub release_date: String,
    pub url: String,
    pub summary: String,
    pub has_more: bool,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillView {
    pub name: String,
    pub level: String,
    pub keywords: Vec<String>,
    pub has_more: bool,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageView {
    pub language: String,
    pub fluency: String,
    pub has_more: bool,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestView {
    pub name: String,
    pub keywords: Vec<String>,
    pub has_more: bool,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceView {
    pub name: String,
    pub reference: String,
    pub has_more: bool,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    pub name: String,
    pub description: String,
    pub url: String,
    pub entity: String,
    pub start_date: String,
    pub end_date: String,
    pub highlights: Vec<String>,
    pub keywords: Vec<String>,
    pub roles: Vec<String>,
    pub has_more: bool,
}

positioned!(
    ProfileLinkView,
    WorkView,
    VolunteerView,
    EducationView,
    AwardView,
    CertificateView,
    PublicationView,
    SkillView,
    LanguageView,
    InterestView,
    ReferenceView,
    ProjectView,
);

/// `has*` flags gating each optional section of the resume template.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionFlags {
    pub has_work: bool,
    pub has_volunteer: bool,
    pub has_education: bool,
    pub has_awards: bool,
    pub has_certificates: bool,
    pub has_publications: bool,
    pub has_skills: bool,
    pub has_languages: bool,
    pub has_interests: bool,
    pub has_references: bool,
    pub has_projects: bool,
    pub has_contact: bool,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeView {
    pub language: String,
    pub labels: BTreeMap<String, String>,
    pub basics: BasicsView,
    pub work: Vec<WorkView>,
    pub volunteer: Vec<VolunteerView>,
    pub education: Vec<EducationView>,
    pub awards: Vec<AwardView>,
    pub certificates: Vec<CertificateView>,
    pub publications: Vec<PublicationView>,
    pub skills: Vec<SkillView>,
    pub languages: Vec<LanguageView>,
    pub interests: Vec<InterestView>,
    pub references: Vec<ReferenceView>,
    pub projects: Vec<ProjectView>,
    pub sections: SectionFlags,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientView {
    pub name: String,
    pub title: String,
    pub company: String,
    pub address: String,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterView {
    pub language: String,
    pub basics: BasicsView,
    pub recipient: RecipientView,
    pub has_recipient: bool,
    pub date: String,
    pub subject: String,
    pub greeting: String,
    pub paragraphs: Vec<String>,
    pub closing: String,
    pub signature: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ContactSlots {
    pub start: String,
    pub middle: String,
    pub end: String,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocxSkill {
    pub name: String,
    pub keywords: String,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocxWork {
    pub name: String,
    pub position: String,
    pub start_date: String,
    pub end_date: String,
    pub summary: String,
    pub highlights: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocxProject {
    pub name: String,
    pub url: String,
    pub highlights: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocxEducation {
    pub institution: String,
    pub study_type: String,
    pub area: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocxView {
    pub name: String,
    pub label: String,
    pub summary: String,
    pub contact_info_start: String,
    pub contact_info_middle: String,
    pub contact_info_end: String,
    pub skills_heading: String,
    pub work_heading: String,
    pub projects_heading: String,
    pub education_heading: String,
    pub has_skills: bool,
    pub has_work: bool,
    pub has_projects: bool,
    pub has_education: bool,
    pub skills: Vec<DocxSkill>,
    pub work: Vec<DocxWork>,
    pub projects: Vec<DocxProject>,
    pub education: Vec<DocxEducation>,
}

pub fn labels(locale: Locale) -> BTreeMap<String, String> {
    LABEL_KEYS
        .iter()
        .map(|k| (k.to_string(), locale.label(k).to_string()))
        .collect()
}

fn location_view(loc: &Value) -> LocationView {
    LocationView {
        address: text(loc, "address"),
        postal_code: text(loc, "postalCode"),
        city: text(loc, "city"),
        country_code: text(loc, "countryCode"),
        region: text(loc, "region"),
        display: format_location(loc),
    }
}

fn basics_view(basics: &Value) -> BasicsView {
    let mut profiles: Vec<ProfileLinkView> = entries(basics, "profiles")
        .iter()
        .map(|p| {
            let network = text(p, "network");
            ProfileLinkView {
                icon: icons::network_icon_name(&network).to_string(),
                network,
                username: text(p, "username"),
                url: text(p, "url"),
                has_more: false,
            }
        })
        .collect();
    mark_positions(&mut profiles);
    BasicsView {
        name: text(basics, "name"),
        label: text(basics, "label"),
        image: text(basics, "image"),
        email: text(basics, "email"),
        phone: text(basics, "phone"),
        url: text(basics, "url"),
        summary: text(basics, "summary"),
        location: location_view(basics.get("location").unwrap_or(&Value::Null)),
        profiles,
    }
}

/// Counts how often each non-empty key occurs, so entries sharing an employer
/// or institution can be grouped visually.
fn occurrences(items: &[Value], key: &str) -> HashMap<String, usize> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for item in items {
        let k = text(item, key);
        if !k.is_empty() {
            *counts.entry(k).or_default() += 1;
        }
    }
    counts
}

/// Canonical projects list: the legacy `sideProjects` key stands in only when
/// `projects` is absent altogether.
fn projects_source(root: &Value) -> &[Value] {
    match root.get("projects") {
        None | Some(Value::Null) => entries(root, "sideProjects"),
        Some(_) => entries(root, "projects"),
    }
}

fn build<T: Positioned>(items: &[Value], f: impl Fn(&Value) -> T) -> Vec<T> {
    let mut out: Vec<T> = items.iter().map(f).collect();
    mark_positions(&mut out);
    out
}

pub fn html_resume(profile: &Profile, locale: Locale) -> ResumeView {
    let root = profile.as_value();
    let basics = basics_view(profile.basics());

    let work_src = profile.section("work");
    let employers = occurrences(work_src, "name");
    let work = build(work_src, |w| {
        let name = text(w, "name");
        WorkView {
            repeat_group: employers.get(&name).copied().unwrap_or(0) > 1,
            name,
            position: text(w, "position"),
            url: text(w, "url"),
            location: text(w, "location"),
            description: text(w, "description"),
            start_date: text(w, "startDate"),
            end_date: text(w, "endDate"),
            summary: text(w, "summary"),
            highlights: strings(w, "highlights"),
            has_more: false,
        }
    });

    let volunteer = build(profile.section("volunteer"), |v| VolunteerView {
        organization: text(v, "organization"),
        position: text(v, "position"),
        url: text(v, "url"),
        start_date: text(v, "startDate"),
        end_date: text(v, "endDate"),
        summary: text(v, "summary"),
        highlights: strings(v, "highlights"),
        has_more: false,
    });

    let edu_src = profile.section("education");
    let institutions = occurrences(edu_src, "institution");
    let education = build(edu_src, |e| {
        let institution = text(e, "institution");
        EducationView {
            repeat_group: institutions.get(&institution).copied().unwrap_or(0) > 1,
            institution,
            url: text(e, "url"),
            area: text(e, "area"),
            study_type: text(e, "studyType"),
            start_date: text(e, "startDate"),
            end_date: text(e, "endDate"),
            score: text(e, "score"),
            courses: strings(e, "courses"),
            has_more: false,
        }
    });

    let awards = build(profile.section("awards"), |a| AwardView {
        title: text(a, "title"),
        date: text(a, "date"),
        awarder: text(a, "awarder"),
        summary: text(a, "summary"),
        has_more: false,
    });

    let certificates = build(profile.section("certificates"), |c| CertificateView {
        name: text(c, "name"),
        date: text(c, "date"),
        issuer: text(c, "issuer"),
        url: text(c, "url"),
        has_more: false,
    });

    let publications = build(profile.section("publications"), |p| PublicationView {
        name: text(p, "name"),
        publisher: text(p, "publisher"),
        release_date: text(p, "releaseDate"),
        url: text(p, "url"),
        summary: text(p, "summary"),
        has_more: false,
    });

    let skills = build(profile.section("skills"), |s| SkillView {
        name: text(s, "name"),
        level: text(s, "level"),
        keywords: strings(s, "keywords"),
        has_more: false,
    });

    let languages = build(profile.section("languages"), |l| LanguageView {
        language: text(l, "language"),
        fluency: text(l, "fluency"),
        has_more: false,
    });

    let interests = build(profile.section("interests"), |i| InterestView {
        name: text(i, "name"),
        keywords: strings(i, "keywords"),
        has_more: false,
    });

    let references = build(profile.section("references"), |r| ReferenceView {
        name: text(r, "name"),
        reference: text(r, "reference"),
        has_more: false,
    });

    let projects = build(projects_source(root), |p| ProjectView {
        name: text(p, "name"),
        description: text(p, "description"),
        url: text(p, "url"),
        entity: text(p, "entity"),
        start_date: text(p, "startDate"),
        end_date: text(p, "endDate"),
        highlights: strings(p, "highlights"),
        keywords: strings(p, "keywords"),
        roles: strings(p, "roles"),
        has_more: false,
    });

    let sections = SectionFlags {
        has_work: !work.is_empty(),
        has_volunteer: !volunteer.is_empty(),
        has_education: !education.is_empty(),
        has_awards: !awards.is_empty(),
        has_certificates: !certificates.is_empty(),
        has_publications: !publications.is_empty(),
        has_skills: !skills.is_empty(),
        has_languages: !languages.is_empty(),
        has_interests: !interests.is_empty(),
        has_references: !references.is_empty(),
        has_projects: !projects.is_empty(),
        has_contact: !basics.email.is_empty()
            || !basics.phone.is_empty()
            || !basics.location.display.is_empty()
            || !basics.url.is_empty()
            || !basics.profiles.is_empty(),
    };

    ResumeView {
        language: locale.code().to_string(),
        labels: labels(locale),
        basics,
        work,
        volunteer,
        education,
        awards,
        certificates,
        publications,
        skills,
        languages,
        interests,
        references,
        projects,
        sections,
    }
}

/// Splits letter body text into paragraphs: an explicit `paragraphs` array
/// wins, otherwise `content` is cut on blank lines.
fn letter_paragraphs(root: &Value) -> Vec<String> {
    let explicit = strings(root, "paragraphs");
    let source = if explicit.is_empty() {
        text(root, "content")
            .replace("\r\n", "\n")
            .split("\n\n")
            .map(str::to_string)
            .collect()
    } else {
        explicit
    };
    source
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

pub fn cover_letter(profile: &Profile, locale: Locale) -> LetterView {
    let root = profile.as_value();
    let basics = basics_view(profile.basics());
    let recipient_src = root.get("recipient").unwrap_or(&Value::Null);
    let address = {
        let explicit = text(recipient_src, "address");
        if explicit.is_empty() {
            format_location(recipient_src.get("location").unwrap_or(&Value::Null))
        } else {
            explicit
        }
    };
    let recipient = RecipientView {
        name: text(recipient_src, "name"),
        title: text(recipient_src, "title"),
        company: text(recipient_src, "company"),
        address,
    };
    let has_recipient = !(recipient.name.is_empty()
        && recipient.title.is_empty()
        && recipient.company.is_empty()
        && recipient.address.is_empty());
    let signature = {
        let s = text(root, "signature");
        if s.is_empty() {
            basics.name.clone()
        } else {
            s
        }
    };
    LetterView {
        language: locale.code().to_string(),
        date: format_date(&text(root, "date"), locale, DateStyle::Long),
        subject: text(root, "subject"),
        greeting: text(root, "greeting"),
        paragraphs: letter_paragraphs(root),
        closing: text(root, "closing"),
        signature,
        basics,
        recipient,
        has_recipient,
    }
}

/// Packs up to four contact items into the three runs the DOCX skeleton lays
/// out with separators between them.
pub fn pack_contact(items: &[String]) -> ContactSlots {
    let items: Vec<&str> = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    let (start, middle, end) = match items.as_slice() {
        [] => (String::new(), String::new(), String::new()),
        [a] => (a.to_string(), String::new(), String::new()),
        [a, b] => (a.to_string(), String::new(), b.to_string()),
        [a, b, c] => (a.to_string(), b.to_string(), c.to_string()),
        [a, b, c, d, ..] => (a.to_string(), format!("{b} | {c}"), d.to_string()),
    };
    ContactSlots { start, middle, end }
}

pub fn docx_resume(profile: &Profile, locale: Locale) -> DocxView {
    let basics = profile.basics();
    let location = format_location_compact(basics.get("location").unwrap_or(&Value::Null));
    let contact = pack_contact(&[
        text(basics, "email"),
        text(basics, "phone"),
        location,
        text(basics, "url"),
    ]);

    let skills: Vec<DocxSkill> = profile
        .section("skills")
        .iter()
        .map(|s| DocxSkill {
            name: text(s, "name"),
            keywords: strings(s, "keywords").join(", "),
        })
        .collect();

    let work: Vec<DocxWork> = profile
        .section("work")
        .iter()
        .map(|w| {
            let end = format_date(&text(w, "endDate"), locale, DateStyle::Short);
            DocxWork {
                name: text(w, "name"),
                position: text(w, "position"),
                start_date: format_date(&text(w, "startDate"), locale, DateStyle::Short),
                end_date: if end.is_empty() {
                    locale.label("present").to_string()
                } else {
                    end
                },
                summary: text(w, "summary"),
                highlights: strings(w, "highlights"),
            }
        })
        .collect();

    let projects: Vec<DocxProject> = profile
        .section("projects")
        .iter()
        .map(|p| DocxProject {
            name: text(p, "name"),
            url: text(p, "url"),
            highlights: strings(p, "highlights"),
        })
        .collect();

    let education: Vec<DocxEducation> = profile
        .section("education")
        .iter()
        .map(|e| DocxEducation {
            institution: text(e, "institution"),
            study_type: text(e, "studyType"),
            area: text(e, "area"),
            start_date: format_date(&text(e, "startDate"), locale, DateStyle::Short),
            end_date: format_date(&text(e, "endDate"), locale, DateStyle::Short),
        })
        .collect();

    DocxView {
        name: text(basics, "name"),
        label: text(basics, "label"),
        summary: text(basics, "summary"),
        contact_info_start: contact.start,
        contact_info_middle: contact.middle,
        contact_info_end: contact.end,
        skills_heading: locale.label("skills").to_string(),
        work_heading: locale.label("work").to_string(),
        projects_heading: locale.label("projects").to_string(),
        education_heading: locale.label("education").to_string(),
        has_skills: !skills.is_empty(),
        has_work: !work.is_empty(),
        has_projects: !projects.is_empty(),
        has_education: !education.is_empty(),
        skills,
        work,
        projects,
        education,
    }
}

/// Date range string for a single entry, shared by the helpers and tests.
pub fn entry_date_range(entry: &Value, locale: Locale) -> String {
    date_range(&text(entry, "startDate"), &text(entry, "endDate"), locale)
}
