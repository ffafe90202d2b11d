use super::filters::{CategoryFilter, QuestionFilter, RangeRequest, RecordFilter};
use super::EngineSettings;
use crate::core::{
    DepartmentId, EnrichedResponse, EntityKind, Error, Result, Survey, SurveyId, NO_DEPARTMENT,
};
use crate::department::{flat_view, nested_view, DepartmentForest, FlatDepartment, NestedDepartment};
use crate::expansion::{expand_responses, ExpansionContext};
use crate::io::store::DataStore;
use crate::report::{
    Breakdowns, CategoryReport, DepartmentGenerationReport, DepartmentLevelReport,
    GenerationSlice, GroupLabel, LabeledTable, LevelTables, MetadataCatalog, OverviewReport,
    QuestionChartReport, QuestionReport, RangeReport, RangeTable, ScoreTable, SpecificReport,
    SubdepartmentReport,
};
use crate::stats::{
    bucket_records, chart_by_dimension, compute_by_question, compute_department_statistics,
    compute_statistics, group_by_category, group_records, ranges_from_boundaries, Category,
    QuestionStatistics,
};
use std::collections::BTreeMap;
use tracing::{debug, info_span};

/// Everything one report needs, fetched up front.
struct SurveyData {
    survey: Survey,
    forest: DepartmentForest,
    records: Vec<EnrichedResponse>,
    catalog: MetadataCatalog,
}

impl SurveyData {
    fn select<F>(&self, predicate: F) -> Vec<&EnrichedResponse>
    where
        F: Fn(&EnrichedResponse) -> bool,
    {
        self.records.iter().filter(|r| predicate(r)).collect()
    }

    fn require_department(&self, id: DepartmentId) -> Result<()> {
        if self.forest.contains(id) {
            Ok(())
        } else {
            Err(Error::not_found(EntityKind::Department, id))
        }
    }

    /// One labelled table per group of `category`, in key order.
    ///
    /// Departments are rolled up over the whole forest, so every department
    /// appears even without responses of its own.
    fn breakdown(
        &self,
        records: &[&EnrichedResponse],
        category: Category,
        top_only: bool,
    ) -> Vec<LabeledTable> {
        match category {
            Category::Department => {
                let mut targets: Vec<DepartmentId> = if top_only {
                    self.forest.roots().to_vec()
                } else {
                    self.forest.iter().map(|n| n.id()).collect()
                };
                targets.sort_unstable();
                compute_department_statistics(&self.forest, records.iter().copied(), &targets)
                    .into_iter()
                    .map(|(id, stats)| {
                        LabeledTable::new(self.catalog.label(Category::Department, id), &stats)
                    })
                    .collect()
            }
            _ => group_by_category(records.iter().copied(), category)
                .into_iter()
                .map(|(id, stats)| LabeledTable::new(self.catalog.label(category, id), &stats))
                .collect(),
        }
    }

    fn breakdowns(
        &self,
        records: &[&EnrichedResponse],
        categories: &[Category],
        top_only: bool,
    ) -> Breakdowns {
        let mut breakdowns = Breakdowns::default();
        for &category in categories {
            breakdowns.set(category, self.breakdown(records, category, top_only));
        }
        breakdowns
    }
}

/// Report computations over one data store.
///
/// Holds no per-request state; concurrent calls on a shared instance are
/// independent.
pub struct SurveyAnalytics<'s, S: DataStore + ?Sized> {
    store: &'s S,
    settings: EngineSettings,
}

impl<'s, S: DataStore + ?Sized> SurveyAnalytics<'s, S> {
    pub fn new(store: &'s S, settings: EngineSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    fn survey(&self, survey_id: SurveyId) -> Result<Survey> {
        self.store
            .survey(survey_id)?
            .ok_or_else(|| Error::not_found(EntityKind::Survey, survey_id))
    }

    fn load(&self, survey_id: SurveyId) -> Result<SurveyData> {
        let survey = self.survey(survey_id)?;
        let departments = self.store.departments(&survey.project)?;
        let answers = self.store.quantitative_responses(survey_id)?;
        let context = ExpansionContext::load(
            self.store,
            &survey,
            &answers,
            self.settings.unknown_generation,
        )?;
        let records = expand_responses(&answers, &context);

        let catalog = MetadataCatalog::new(
            self.store.dimensions(&survey.project)?,
            departments.clone(),
            self.store.roles(&survey.project)?,
            context.generations().iter().cloned().collect(),
        );
        let forest = DepartmentForest::build(&departments);

        debug!(
            survey_id,
            project = %survey.project,
            departments = forest.len(),
            records = records.len(),
            "Loaded survey data"
        );
        Ok(SurveyData {
            survey,
            forest,
            records,
            catalog,
        })
    }

    /// Survey-wide table plus the breakdowns listed in `gets`.
    pub fn compute_overview(
        &self,
        survey_id: SurveyId,
        gets: &[Category],
    ) -> Result<OverviewReport> {
        let _span = info_span!("compute_overview", survey_id).entered();
        let data = self.load(survey_id)?;
        let records: Vec<&EnrichedResponse> = data.records.iter().collect();

        Ok(OverviewReport {
            survey_id,
            table: ScoreTable::from(compute_statistics(records.iter().copied())),
            breakdowns: data.breakdowns(&records, gets, false),
        })
    }

    /// Results for `category == id`, broken down by every other category.
    pub fn compute_by_category(
        &self,
        survey_id: SurveyId,
        filter: CategoryFilter,
        top_departments_only: bool,
    ) -> Result<CategoryReport> {
        let _span =
            info_span!("compute_by_category", survey_id, category = %filter.category).entered();
        let data = self.load(survey_id)?;
        let group = self.group_label(&data, filter)?;
        let records = data.select(|r| filter.matches(r));

        let others: Vec<Category> = Category::ALL
            .into_iter()
            .filter(|c| *c != filter.category)
            .collect();

        Ok(CategoryReport {
            survey_id,
            group,
            table: ScoreTable::from(compute_statistics(records.iter().copied())),
            breakdowns: data.breakdowns(&records, &others, top_departments_only),
        })
    }

    /// A single entry of the `get` breakdown within `category == id`.
    pub fn compute_by_category_specific(
        &self,
        survey_id: SurveyId,
        filter: CategoryFilter,
        get: CategoryFilter,
    ) -> Result<SpecificReport> {
        let _span = info_span!("compute_by_category_specific", survey_id).entered();
        let data = self.load(survey_id)?;
        let group = self.group_label(&data, filter)?;
        let records = data.select(|r| filter.matches(r));

        let entry = if get.category == Category::Department {
            data.require_department(get.id)?;
            let stats =
                compute_department_statistics(&data.forest, records.iter().copied(), &[get.id]);
            stats
                .get(&get.id)
                .filter(|s| !s.is_empty())
                .map(|s| LabeledTable::new(data.catalog.label(Category::Department, get.id), s))
        } else {
            let matching = data.select(|r| filter.matches(r) && get.matches(r));
            if matching.is_empty() {
                None
            } else {
                let stats = compute_statistics(matching.iter().copied());
                Some(LabeledTable::new(data.catalog.label(get.category, get.id), &stats))
            }
        };

        Ok(SpecificReport {
            survey_id,
            group,
            category: get.category,
            entry,
        })
    }

    /// Rolled-up table of a department plus one table per direct child.
    pub fn compute_by_subdepartments(
        &self,
        survey_id: SurveyId,
        department_id: DepartmentId,
    ) -> Result<SubdepartmentReport> {
        let _span = info_span!("compute_by_subdepartments", survey_id, department_id).entered();
        let data = self.load(survey_id)?;
        let node = data
            .forest
            .get(department_id)
            .ok_or_else(|| Error::not_found(EntityKind::Department, department_id))?;
        let records = data.select(|r| r.is_within_department(department_id));

        let parent_level = node.department.tree_level;
        let children: Vec<DepartmentId> = data
            .forest
            .children(department_id)
            .iter()
            .copied()
            .filter(|child| {
                data.forest
                    .get(*child)
                    .is_some_and(|c| {
                        parent_level.checked_add(1) == Some(c.department.tree_level)
                    })
            })
            .collect();

        let mut targets = children.clone();
        targets.push(department_id);
        let stats = compute_department_statistics(&data.forest, records.iter().copied(), &targets);

        let own = stats.get(&department_id).cloned().unwrap_or_default();
        let score_subdepts = children
            .iter()
            .filter_map(|id| {
                stats
                    .get(id)
                    .map(|s| LabeledTable::new(data.catalog.label(Category::Department, *id), s))
            })
            .collect();

        Ok(SubdepartmentReport {
            survey_id,
            group: data.catalog.label(Category::Department, department_id),
            table: ScoreTable::from(&own),
            score_subdepts,
        })
    }

    /// One table per range of the requested field.
    pub fn compute_by_range(
        &self,
        survey_id: SurveyId,
        request: &RangeRequest,
    ) -> Result<RangeReport> {
        let _span = info_span!("compute_by_range", survey_id, field = %request.field).entered();
        let boundaries = request
            .boundaries
            .as_deref()
            .unwrap_or_else(|| self.settings.default_boundaries(request.field));
        let ranges = ranges_from_boundaries(boundaries)?;

        let data = self.load(survey_id)?;
        let records = data.select(|r| request.filter.is_none_or(|f| f.matches(r)));
        let buckets = bucket_records(records.iter().copied(), &ranges, request.field);

        let extra = [Category::Dimension, Category::Role, Category::Gender];
        let tables = buckets
            .into_iter()
            .zip(ranges.iter())
            .map(|(bucket, range)| RangeTable {
                range: range.as_pair(),
                table: ScoreTable::from(compute_statistics(bucket.iter().copied())),
                breakdowns: if request.more {
                    data.breakdowns(&bucket, &extra, false)
                } else {
                    Breakdowns::default()
                },
            })
            .collect();

        Ok(RangeReport {
            survey_id,
            field: request.field,
            ranges: tables,
        })
    }

    /// Per-question statistics, ordered by question index.
    pub fn compute_by_question(
        &self,
        survey_id: SurveyId,
        filter: &QuestionFilter,
    ) -> Result<QuestionReport> {
        let _span = info_span!("compute_by_question", survey_id).entered();
        let data = self.load(survey_id)?;
        Ok(QuestionReport {
            survey_id,
            questions: Self::questions(&data, filter)?,
        })
    }

    /// Per-question statistics grouped under their dimension.
    pub fn compute_question_chart(
        &self,
        survey_id: SurveyId,
        filter: &QuestionFilter,
    ) -> Result<QuestionChartReport> {
        let _span = info_span!("compute_question_chart", survey_id).entered();
        let data = self.load(survey_id)?;
        let questions = Self::questions(&data, filter)?;
        Ok(QuestionChartReport {
            survey_id,
            dimensions: chart_by_dimension(questions, &data.catalog.dimension_names()),
        })
    }

    fn questions(data: &SurveyData, filter: &QuestionFilter) -> Result<Vec<QuestionStatistics>> {
        if let Some(RecordFilter::Category(CategoryFilter {
            category: Category::Department,
            id,
        })) = filter.filter
        {
            data.require_department(id)?;
        }
        Ok(compute_by_question(data.records.iter().filter(|r| filter.matches(r))))
    }

    /// One table per department at each configured tree level.
    ///
    /// Records whose department sits above a level are grouped under
    /// [`NO_DEPARTMENT`].
    pub fn compute_department_levels(&self, survey_id: SurveyId) -> Result<DepartmentLevelReport> {
        let _span = info_span!("compute_department_levels", survey_id).entered();
        let data = self.load(survey_id)?;

        let levels = self
            .settings
            .department_levels
            .iter()
            .map(|&level| {
                let mut groups: BTreeMap<DepartmentId, Vec<&EnrichedResponse>> = BTreeMap::new();
                for record in &data.records {
                    let id = record.department_at_level(level).unwrap_or(NO_DEPARTMENT);
                    groups.entry(id).or_default().push(record);
                }
                LevelTables {
                    level,
                    departments: groups
                        .into_iter()
                        .map(|(id, group)| {
                            LabeledTable::new(
                                data.catalog.label(Category::Department, id),
                                &compute_statistics(group),
                            )
                        })
                        .collect(),
                }
            })
            .collect();

        Ok(DepartmentLevelReport {
            survey_id,
            response_count: data.records.len() as u64,
            table: ScoreTable::from(compute_statistics(&data.records)),
            levels,
        })
    }

    /// A department subtree sliced by generation.
    pub fn compute_department_generations(
        &self,
        survey_id: SurveyId,
        department_id: DepartmentId,
    ) -> Result<DepartmentGenerationReport> {
        let _span =
            info_span!("compute_department_generations", survey_id, department_id).entered();
        let data = self.load(survey_id)?;
        data.require_department(department_id)?;
        let records = data.select(|r| r.is_within_department(department_id));

        let score_generations = group_records(records.iter().copied(), Category::Generation)
            .into_iter()
            .map(|(generation_id, group)| GenerationSlice {
                group: data.catalog.label(Category::Generation, generation_id),
                score: ScoreTable::from(compute_statistics(group.iter().copied())),
                score_dimensions: data.breakdown(&group, Category::Dimension, false),
                score_questions: compute_by_question(group.iter().copied()),
            })
            .collect();

        Ok(DepartmentGenerationReport {
            survey_id,
            group: data.catalog.label(Category::Department, department_id),
            score: ScoreTable::from(compute_statistics(records.iter().copied())),
            score_generations,
        })
    }

    /// Nested department tree of the survey's project.
    pub fn department_tree(&self, survey_id: SurveyId) -> Result<Vec<NestedDepartment>> {
        Ok(nested_view(&self.project_forest(survey_id)?))
    }

    /// Flattened department list of the survey's project, ordered by id.
    pub fn department_flat(&self, survey_id: SurveyId) -> Result<Vec<FlatDepartment>> {
        Ok(flat_view(&self.project_forest(survey_id)?))
    }

    fn project_forest(&self, survey_id: SurveyId) -> Result<DepartmentForest> {
        let survey = self.survey(survey_id)?;
        let departments = self.store.departments(&survey.project)?;
        Ok(DepartmentForest::build(&departments))
    }

    /// Label for a filter's group; unknown ids are rejected.
    fn group_label(&self, data: &SurveyData, filter: CategoryFilter) -> Result<GroupLabel> {
        let kind = match filter.category {
            Category::Dimension => Some(EntityKind::Dimension),
            Category::Department => Some(EntityKind::Department),
            Category::Role => Some(EntityKind::Role),
            Category::Generation => Some(EntityKind::Generation),
            Category::Gender => None,
        };
        if let Some(kind) = kind {
            if !data.catalog.contains(filter.category, filter.id) {
                return Err(Error::not_found(kind, filter.id));
            }
        }
        debug!(
            project = %data.survey.project,
            category = %filter.category,
            id = filter.id,
            "Resolved filter group"
        );
        Ok(data.catalog.label(filter.category, filter.id))
    }
}
