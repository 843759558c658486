// ── Search query builder ──
//
// Turns loosely typed filter/sort/pagination input into a validated
// `SearchRequest`. Filters flagged `or` collect into the single OR
// subgroup; everything else is AND-ed. The server enforces the same
// limits, so violating input is rejected before any request is sent.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use strum::{Display, EnumString};

use crate::attrs::AttributeBag;
use crate::error::ValidationError;

pub const MAX_OR_FILTERS: usize = 3;
pub const MAX_FILTERS: usize = 8;
pub const DEFAULT_OFFSET: i64 = 0;
pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

// ── Raw input ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFilter {
    pub property: String,
    pub operator: String,
    pub values: Vec<String>,
    /// Member of the OR subgroup instead of the AND list.
    pub or: bool,
}

impl RawFilter {
    pub fn new(property: &str, operator: &str, values: &[&str]) -> Self {
        Self {
            property: property.to_owned(),
            operator: operator.to_owned(),
            values: values.iter().map(|v| (*v).to_owned()).collect(),
            or: false,
        }
    }

    pub fn or(mut self) -> Self {
        self.or = true;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSort {
    pub direction: Option<String>,
    pub property: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawPagination {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

/// Search input as read from a local attribute bag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSearch {
    pub filters: Vec<RawFilter>,
    pub sort: Vec<RawSort>,
    pub pagination: Option<RawPagination>,
}

impl RawSearch {
    /// Read the `filter`, `sort` and `pagination` groups.
    pub fn from_attributes(bag: &AttributeBag) -> Result<Self, ValidationError> {
        let filters = bag
            .blocks("filter")?
            .into_iter()
            .map(|f| -> Result<RawFilter, ValidationError> {
                Ok(RawFilter {
                    property: f.string("property")?.unwrap_or_default(),
                    operator: f.string("operator")?.unwrap_or_default(),
                    values: f.strings("values")?.unwrap_or_default(),
                    or: f.boolean("or")?.unwrap_or(false),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let sort = bag
            .blocks("sort")?
            .into_iter()
            .map(|s| -> Result<RawSort, ValidationError> {
                Ok(RawSort {
                    direction: s.string("direction")?,
                    property: s.string("property")?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let pagination = bag
            .block("pagination")?
            .map(|p| {
                Ok::<_, ValidationError>(RawPagination {
                    offset: p.int("offset")?,
                    limit: p.int("limit")?,
                })
            })
            .transpose()?;

        Ok(Self {
            filters,
            sort,
            pagination,
        })
    }
}

// ── Request ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterExpression {
    pub property: String,
    pub operator: String,
    pub values: Vec<String>,
}

/// AND list plus at most one OR subgroup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterGroup {
    pub and: Vec<FilterExpression>,
    pub or: Vec<FilterExpression>,
}

impl FilterGroup {
    /// Number of top-level AND members, counting the OR subgroup as one.
    pub fn len(&self) -> usize {
        self.and.len() + usize::from(!self.or.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum FilterClause<'a> {
    Expression(&'a FilterExpression),
    Or { or: &'a [FilterExpression] },
}

impl Serialize for FilterGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut clauses: Vec<FilterClause<'_>> =
            self.and.iter().map(FilterClause::Expression).collect();
        if !self.or.is_empty() {
            clauses.push(FilterClause::Or { or: &self.or });
        }
        let mut state = serializer.serialize_struct("FilterGroup", 1)?;
        state.serialize_field("and", &clauses)?;
        state.end()
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Display, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortCriteria {
    pub direction: SortDirection,
    pub property: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub offset: i64,
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: DEFAULT_OFFSET,
            limit: DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub filter: FilterGroup,
    pub pagination: Pagination,
    pub sort: Vec<SortCriteria>,
}

// ── Builder ─────────────────────────────────────────────────────────

/// Builds search requests for one resource kind.
#[derive(Debug, Clone)]
pub struct SearchQueryBuilder {
    default_sort_property: String,
    strict_pagination: bool,
}

impl SearchQueryBuilder {
    pub fn new(default_sort_property: impl Into<String>) -> Self {
        Self {
            default_sort_property: default_sort_property.into(),
            strict_pagination: false,
        }
    }

    /// Reject out-of-range pagination locally instead of leaving it to
    /// the server.
    pub fn strict_pagination(mut self, strict: bool) -> Self {
        self.strict_pagination = strict;
        self
    }

    pub fn build_from(&self, raw: &RawSearch) -> Result<SearchRequest, ValidationError> {
        self.build(&raw.filters, &raw.sort, raw.pagination.as_ref())
    }

    pub fn build(
        &self,
        filters: &[RawFilter],
        sort: &[RawSort],
        pagination: Option<&RawPagination>,
    ) -> Result<SearchRequest, ValidationError> {
        Ok(SearchRequest {
            filter: Self::filter_group(filters)?,
            pagination: self.pagination(pagination)?,
            sort: self.sort(sort)?,
        })
    }

    fn filter_group(filters: &[RawFilter]) -> Result<FilterGroup, ValidationError> {
        let mut group = FilterGroup::default();
        for raw in filters {
            let expr = FilterExpression {
                property: raw.property.clone(),
                operator: raw.operator.clone(),
                values: raw.values.clone(),
            };
            if raw.or {
                group.or.push(expr);
            } else {
                group.and.push(expr);
            }
        }

        if group.or.len() > MAX_OR_FILTERS {
            return Err(ValidationError::TooManyOrFilters {
                passed: group.or.len(),
                max: MAX_OR_FILTERS,
            });
        }
        if group.len() > MAX_FILTERS {
            return Err(ValidationError::TooManyFilters {
                provided: group.len(),
                max: MAX_FILTERS,
            });
        }
        if group.is_empty() {
            return Err(ValidationError::NoFilters);
        }
        Ok(group)
    }

    fn pagination(&self, raw: Option<&RawPagination>) -> Result<Pagination, ValidationError> {
        let Some(raw) = raw else {
            return Ok(Pagination::default());
        };
        let page = Pagination {
            offset: raw.offset.unwrap_or(DEFAULT_OFFSET),
            limit: raw.limit.unwrap_or(DEFAULT_LIMIT),
        };

        if self.strict_pagination {
            if page.offset < 0 {
                return Err(ValidationError::PaginationOutOfBounds {
                    field: "offset",
                    value: page.offset,
                    bounds: ">= 0",
                });
            }
            if !(1..=MAX_LIMIT).contains(&page.limit) {
                return Err(ValidationError::PaginationOutOfBounds {
                    field: "limit",
                    value: page.limit,
                    bounds: "1..=100",
                });
            }
        }
        Ok(page)
    }

    fn sort(&self, raw: &[RawSort]) -> Result<Vec<SortCriteria>, ValidationError> {
        if raw.is_empty() {
            return Ok(vec![SortCriteria {
                direction: SortDirection::Desc,
                property: self.default_sort_property.clone(),
            }]);
        }

        raw.iter()
            .map(|s| -> Result<SortCriteria, ValidationError> {
                let direction = match s.direction.as_deref() {
                    None | Some("") => SortDirection::default(),
                    Some(d) => d.parse().map_err(|_| ValidationError::InvalidValue {
                        key: "sort.direction".into(),
                        value: d.to_owned(),
                        reason: "expected ASC or DESC".into(),
                    })?,
                };
                let property = s
                    .property
                    .clone()
                    .filter(|p| !p.is_empty())
                    .unwrap_or_else(|| self.default_sort_property.clone());
                Ok(SortCriteria {
                    direction,
                    property,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const UPDATED: &str = "/changeLog/updatedDateTime";

    fn builder() -> SearchQueryBuilder {
        SearchQueryBuilder::new(UPDATED)
    }

    fn and_filter(i: usize) -> RawFilter {
        RawFilter::new(&format!("/p{i}"), "=", &["v"])
    }

    #[test]
    fn three_or_filters_are_accepted_four_rejected() {
        let three: Vec<_> = (0..3).map(|i| and_filter(i).or()).collect();
        let req = builder().build(&three, &[], None).unwrap();
        assert_eq!(req.filter.or.len(), 3);
        assert_eq!(req.filter.len(), 1);

        let four: Vec<_> = (0..4).map(|i| and_filter(i).or()).collect();
        let err = builder().build(&four, &[], None).unwrap_err();
        assert_eq!(err, ValidationError::TooManyOrFilters { passed: 4, max: 3 });
    }

    #[test]
    fn or_group_counts_as_one_against_the_total() {
        let mut filters: Vec<_> = (0..7).map(and_filter).collect();
        filters.push(and_filter(7).or());
        filters.push(and_filter(8).or());
        let req = builder().build(&filters, &[], None).unwrap();
        assert_eq!(req.filter.len(), 8);

        filters.push(and_filter(9));
        let err = builder().build(&filters, &[], None).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooManyFilters {
                provided: 9,
                max: 8,
            }
        );
    }

    #[test]
    fn empty_filters_are_rejected() {
        let err = builder().build(&[], &[], None).unwrap_err();
        assert_eq!(err, ValidationError::NoFilters);
    }

    #[test]
    fn defaults_apply_when_sort_and_pagination_missing() {
        let req = builder().build(&[and_filter(0)], &[], None).unwrap();
        assert_eq!(
            req.pagination,
            Pagination {
                offset: 0,
                limit: 20,
            }
        );
        assert_eq!(
            req.sort,
            vec![SortCriteria {
                direction: SortDirection::Desc,
                property: UPDATED.into(),
            }]
        );
    }

    #[test]
    fn partial_pagination_fills_defaults() {
        let raw = RawPagination {
            offset: Some(40),
            limit: None,
        };
        let req = builder().build(&[and_filter(0)], &[], Some(&raw)).unwrap();
        assert_eq!(req.pagination.offset, 40);
        assert_eq!(req.pagination.limit, 20);
    }

    #[test]
    fn pagination_bounds_only_in_strict_mode() {
        let raw = RawPagination {
            offset: Some(0),
            limit: Some(500),
        };
        let lenient = builder().build(&[and_filter(0)], &[], Some(&raw)).unwrap();
        assert_eq!(lenient.pagination.limit, 500);

        let err = builder()
            .strict_pagination(true)
            .build(&[and_filter(0)], &[], Some(&raw))
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::PaginationOutOfBounds { field: "limit", .. }
        ));
    }

    #[test]
    fn sort_preserves_order_and_fills_gaps() {
        let sort = [
            RawSort {
                direction: Some("asc".into()),
                property: Some("/name".into()),
            },
            RawSort {
                direction: None,
                property: None,
            },
        ];
        let req = builder().build(&[and_filter(0)], &sort, None).unwrap();
        assert_eq!(req.sort[0].direction, SortDirection::Asc);
        assert_eq!(req.sort[0].property, "/name");
        assert_eq!(req.sort[1].direction, SortDirection::Desc);
        assert_eq!(req.sort[1].property, UPDATED);

        let bad = [RawSort {
            direction: Some("sideways".into()),
            property: None,
        }];
        assert!(builder().build(&[and_filter(0)], &bad, None).is_err());
    }

    #[test]
    fn wire_form_nests_or_group_inside_and() {
        let filters = [
            RawFilter::new("/name", "=", &["fcr"]),
            RawFilter::new("/state", "=", &["PROVISIONED"]).or(),
            RawFilter::new("/state", "=", &["PROVISIONING"]).or(),
        ];
        let req = builder().build(&filters, &[], None).unwrap();
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "filter": { "and": [
                    { "property": "/name", "operator": "=", "values": ["fcr"] },
                    { "or": [
                        { "property": "/state", "operator": "=", "values": ["PROVISIONED"] },
                        { "property": "/state", "operator": "=", "values": ["PROVISIONING"] }
                    ]}
                ]},
                "pagination": { "offset": 0, "limit": 20 },
                "sort": [ { "direction": "DESC", "property": UPDATED } ]
            })
        );
    }

    #[test]
    fn raw_search_reads_attribute_groups() {
        let bag = AttributeBag::new()
            .with(
                "filter",
                vec![
                    AttributeBag::new()
                        .with("property", "/project/projectId")
                        .with("operator", "=")
                        .with("values", vec!["p-1".to_owned()]),
                    AttributeBag::new()
                        .with("property", "/name")
                        .with("operator", "like")
                        .with("values", vec!["%edge%".to_owned()])
                        .with("or", true),
                ],
            )
            .with(
                "pagination",
                AttributeBag::new().with("offset", 5_i64).with("limit", 10_i64),
            );
        let raw = RawSearch::from_attributes(&bag).unwrap();
        assert_eq!(raw.filters.len(), 2);
        assert!(raw.filters[1].or);
        let req = builder().build_from(&raw).unwrap();
        assert_eq!(req.filter.and.len(), 1);
        assert_eq!(req.filter.or.len(), 1);
        assert_eq!(
            req.pagination,
            Pagination {
                offset: 5,
                limit: 10,
            }
        );
    }
}
