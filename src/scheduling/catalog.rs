//! Shift template catalog.
//!
//! Holds the library of shift archetypes and turns them into dated
//! [`Shift`]s. A shift receives its own copy of the role quota, so editing a
//! shift never touches the template.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    ExperienceTier, Priority, Role, Shift, ShiftRequirements, ShiftStatus, ShiftTemplate,
    TemplateCategory,
};

/// The hours a single template may span.
const MAX_TEMPLATE_HOURS: Decimal = Decimal::from_parts(24, 0, 0, false, 0);

/// An ordered, validated collection of shift templates.
#[derive(Debug, Clone, Default)]
pub struct ShiftTemplateCatalog {
    templates: Vec<ShiftTemplate>,
}

impl ShiftTemplateCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog, validating every template.
    pub fn from_templates(templates: Vec<ShiftTemplate>) -> EngineResult<Self> {
        let mut catalog = Self::new();
        for template in templates {
            catalog.add_template(template)?;
        }
        Ok(catalog)
    }

    /// The built-in catalog for a store open 07:00-22:00 on weekdays with
    /// a single long shift on weekends and an optional overnight crew.
    pub fn standard() -> Self {
        let time = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap_or_default();
        let template = |id: &str,
                        name: &str,
                        category,
                        (start, end, hours): (u32, u32, i64),
                        breaks: &[u32],
                        positions: &[(Role, u32)],
                        priority,
                        bonus: Option<Decimal>| ShiftTemplate {
            id: id.to_string(),
            name: name.to_string(),
            category,
            start_time: time(start),
            end_time: time(end),
            duration_hours: Decimal::from(hours),
            breaks: breaks.iter().map(|h| time(*h)).collect(),
            positions: positions.iter().copied().collect(),
            priority,
            bonus_multiplier: bonus,
        };

        Self {
            templates: vec![
                template(
                    "weekday_morning",
                    "Weekday Morning",
                    TemplateCategory::Weekday,
                    (7, 15, 8),
                    &[11],
                    &[(Role::Manager, 1), (Role::Cashier, 2), (Role::StockClerk, 1)],
                    Priority::High,
                    None,
                ),
                template(
                    "weekday_afternoon",
                    "Weekday Afternoon",
                    TemplateCategory::Weekday,
                    (12, 18, 6),
                    &[15],
                    &[(Role::Cashier, 2), (Role::CustomerService, 1)],
                    Priority::Medium,
                    None,
                ),
                template(
                    "weekday_evening",
                    "Weekday Evening",
                    TemplateCategory::Weekday,
                    (17, 22, 5),
                    &[],
                    &[(Role::Cashier, 1), (Role::Cleaner, 1)],
                    Priority::Medium,
                    None,
                ),
                template(
                    "overnight",
                    "Overnight",
                    TemplateCategory::Overnight,
                    (22, 6, 8),
                    &[2],
                    &[(Role::Security, 1), (Role::StockClerk, 2)],
                    Priority::Low,
                    Some(Decimal::new(125, 2)),
                ),
                template(
                    "weekend_long",
                    "Weekend Long Shift",
                    TemplateCategory::Weekend,
                    (9, 19, 10),
                    &[12, 16],
                    &[
                        (Role::Manager, 1),
                        (Role::Cashier, 3),
                        (Role::CustomerService, 1),
                        (Role::StockClerk, 1),
                    ],
                    Priority::High,
                    Some(Decimal::new(15, 1)),
                ),
            ],
        }
    }

    /// Returns every template in catalog order.
    pub fn list_templates(&self) -> &[ShiftTemplate] {
        &self.templates
    }

    /// Looks up a template by id.
    pub fn get_template(&self, template_id: &str) -> EngineResult<&ShiftTemplate> {
        self.templates
            .iter()
            .find(|t| t.id == template_id)
            .ok_or_else(|| EngineError::TemplateNotFound {
                template_id: template_id.to_string(),
            })
    }

    /// Templates of one category, in catalog order.
    pub fn templates_for(
        &self,
        category: TemplateCategory,
    ) -> impl Iterator<Item = &ShiftTemplate> {
        self.templates.iter().filter(move |t| t.category == category)
    }

    /// Adds a new template.
    pub fn add_template(&mut self, template: ShiftTemplate) -> EngineResult<()> {
        validate_template(&template)?;
        if self.templates.iter().any(|t| t.id == template.id) {
            return Err(EngineError::InvalidTemplate {
                template_id: template.id,
                message: "a template with this id already exists".to_string(),
            });
        }
        self.templates.push(template);
        Ok(())
    }

    /// Replaces an existing template, returning the previous definition.
    ///
    /// Shifts already instantiated keep their own quota and are unaffected.
    pub fn replace_template(&mut self, template: ShiftTemplate) -> EngineResult<ShiftTemplate> {
        validate_template(&template)?;
        let slot = self
            .templates
            .iter_mut()
            .find(|t| t.id == template.id)
            .ok_or_else(|| EngineError::TemplateNotFound {
                template_id: template.id.clone(),
            })?;
        Ok(std::mem::replace(slot, template))
    }

    /// Removes a template, returning it.
    pub fn remove_template(&mut self, template_id: &str) -> EngineResult<ShiftTemplate> {
        let index = self
            .templates
            .iter()
            .position(|t| t.id == template_id)
            .ok_or_else(|| EngineError::TemplateNotFound {
                template_id: template_id.to_string(),
            })?;
        Ok(self.templates.remove(index))
    }

    /// Instantiates the template with the given id on a date.
    pub fn instantiate_by_id(
        &self,
        template_id: &str,
        date: NaiveDate,
        shift_id: impl Into<String>,
    ) -> EngineResult<Shift> {
        let template = self.get_template(template_id)?;
        Ok(instantiate(template, date, shift_id))
    }
}

/// Creates a fresh, unassigned shift from a template on a date.
///
/// # Examples
///
/// ```
/// use shift_engine::scheduling::{instantiate, ShiftTemplateCatalog};
/// use shift_engine::models::{Role, ShiftStatus};
/// use chrono::NaiveDate;
///
/// let catalog = ShiftTemplateCatalog::standard();
/// let template = catalog.get_template("overnight").unwrap();
/// let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
///
/// let mut shift = instantiate(template, date, "shift_1");
/// assert_eq!(shift.status, ShiftStatus::Scheduled);
/// assert_eq!(shift.end_time.date(), NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());
///
/// shift.positions.insert(Role::Security, 5);
/// assert_eq!(template.positions[&Role::Security], 1);
/// ```
pub fn instantiate(template: &ShiftTemplate, date: NaiveDate, shift_id: impl Into<String>) -> Shift {
    let start_time = date.and_time(template.start_time);
    let end_date = if template.crosses_midnight() {
        date + Duration::days(1)
    } else {
        date
    };
    let end_time = end_date.and_time(template.end_time);
    let positions = template.positions.clone();
    let requirements = compute_requirements(&positions, template.priority, template.category);

    Shift {
        id: shift_id.into(),
        template_id: template.id.clone(),
        date,
        start_time,
        end_time,
        duration_hours: template.duration_hours,
        priority: template.priority,
        bonus_multiplier: template.bonus_multiplier,
        positions,
        assignments: Vec::new(),
        status: ShiftStatus::Scheduled,
        requirements,
        performance: None,
    }
}

/// Derives staffing requirements from a quota.
///
/// Critical roles set the minimum headcount. High-priority and overnight
/// shifts ask for experienced staff.
pub fn compute_requirements(
    positions: &BTreeMap<Role, u32>,
    priority: Priority,
    category: TemplateCategory,
) -> ShiftRequirements {
    let staffed: Vec<Role> = positions
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(role, _)| *role)
        .collect();

    let max_staff: u32 = positions.values().sum();
    let critical_roles: Vec<Role> = staffed.iter().copied().filter(|r| r.is_critical()).collect();
    let critical_headcount: u32 = critical_roles
        .iter()
        .map(|r| positions.get(r).copied().unwrap_or(0))
        .sum();
    let min_staff = if max_staff == 0 {
        0
    } else {
        critical_headcount.max(1)
    };

    let mut preferred_skills: Vec<String> = staffed
        .iter()
        .flat_map(|r| r.preferred_skills().iter().map(|s| s.to_string()))
        .collect();
    preferred_skills.sort();
    preferred_skills.dedup();

    let experience = if priority == Priority::High || category == TemplateCategory::Overnight {
        ExperienceTier::Experienced
    } else {
        ExperienceTier::Any
    };

    ShiftRequirements {
        min_staff,
        max_staff,
        critical_roles,
        preferred_skills,
        experience,
    }
}

fn validate_template(template: &ShiftTemplate) -> EngineResult<()> {
    let reject = |message: &str| EngineError::InvalidTemplate {
        template_id: template.id.clone(),
        message: message.to_string(),
    };

    if template.id.trim().is_empty() {
        return Err(reject("id must not be empty"));
    }
    if template.duration_hours <= Decimal::ZERO {
        return Err(reject("duration must be positive"));
    }
    if template.duration_hours > MAX_TEMPLATE_HOURS {
        return Err(reject("duration must not exceed 24 hours"));
    }
    if template
        .bonus_multiplier
        .is_some_and(|m| m <= Decimal::ZERO)
    {
        return Err(reject("bonus multiplier must be positive"));
    }
    Ok(())
}
