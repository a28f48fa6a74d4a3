//! Content templates for each research perspective.
//!
//! Every template uses `{topic}` as its only placeholder. Paragraphs are
//! separated by blank lines; the layout engine keeps them apart on the page.

/// Overview & fundamentals.
pub const OVERVIEW: &str = r#"{topic} is a field that has drawn sustained attention from researchers, practitioners and decision makers. At its core, {topic} brings together a set of ideas, methods and tools that address a recurring class of problems, and understanding those foundations is the first step toward using it well.

The fundamentals of {topic} can be grouped into three layers: the underlying principles that explain why it works, the techniques that turn those principles into repeatable practice, and the surrounding ecosystem of organizations, standards and communities that sustain it.

Key concepts include the scope of what {topic} covers, the vocabulary used by specialists, and the measures by which progress is judged. A clear grasp of these concepts makes the remaining sections of this report easier to interpret."#;

/// Historical context.
pub const HISTORY: &str = r#"The history of {topic} reaches back further than most people assume. Early work was exploratory and fragmented, carried out by small groups who often did not know of one another's progress.

A turning point came when the first widely shared methods for {topic} appeared. Shared methods allowed results to be compared, and comparison drove rapid refinement. Over the following decades {topic} moved from a niche interest to an established discipline with dedicated institutions, publications and professional roles.

Several milestones stand out: the formalization of core principles, the first large-scale deployments, and the arrival of supporting technologies that lowered the cost of adoption. Each milestone widened the audience for {topic} and shaped the expectations that practitioners bring to it today."#;

/// Current trends.
pub const CURRENT_TRENDS: &str = r#"{topic} is changing quickly. The most visible trend is the growing role of data and automation, which lets teams working on {topic} iterate faster and measure outcomes more precisely than before.

A second trend is convergence. Ideas from adjacent fields are being folded into {topic}, producing hybrid approaches that outperform the methods of only a few years ago. This has also blurred the traditional boundaries between specialist roles.

Finally, expectations around transparency, sustainability and accessibility are reshaping how {topic} is practiced. Organizations increasingly have to show not only that their work on {topic} is effective, but also that it is responsible."#;

/// Practical applications.
pub const APPLICATIONS: &str = r#"{topic} has found applications across a wide range of sectors. In industry, it is used to improve efficiency, reduce waste and open new product lines. In the public sector, {topic} supports planning, service delivery and policy evaluation.

Smaller organizations benefit as well. Tooling that once required significant investment is now available at modest cost, which allows startups and community groups to apply {topic} to local problems.

Across these settings, the most successful applications share a pattern: they start with a clearly defined problem, apply {topic} in a focused way, and measure results before scaling up."#;

/// Challenges & limitations.
pub const CHALLENGES: &str = r#"Despite its promise, {topic} faces real challenges. Technical limitations remain, particularly where problems are large, poorly specified or change faster than methods can adapt.

Organizational barriers are just as significant. Adopting {topic} often requires new skills, new processes and a willingness to change established habits. Without sustained support, promising initiatives stall after an initial pilot.

There are also broader concerns around cost, equity and unintended consequences. Addressing them requires open discussion among practitioners, users and those affected by how {topic} is applied."#;

/// Future outlook.
pub const FUTURE: &str = r#"The outlook for {topic} is broadly positive. Continued research is expected to remove several of today's technical limitations, while falling costs should bring {topic} within reach of many more organizations.

Over the next decade, {topic} is likely to become more integrated with everyday tools and workflows. Instead of being a specialist activity, it may become a routine capability that most teams draw on without special effort.

The pace of that change will depend on investment, regulation and public trust. Stakeholders who build expertise in {topic} now will be well placed to shape how it develops."#;

/// Best practices.
pub const BEST_PRACTICES: &str = r#"Experience with {topic} points to a set of practices that consistently improve outcomes. The first is to define goals precisely: vague objectives make it impossible to tell whether an effort involving {topic} has succeeded.

The second is to invest in people. Training, documentation and communities of practice help knowledge about {topic} spread beyond a handful of experts.

The third is to iterate. Start small, measure carefully, learn from what does not work and expand what does. Teams that treat {topic} as an ongoing practice rather than a one-time project tend to see the strongest long-term results."#;

/// Case studies.
pub const CASE_STUDIES: &str = r#"Real-world examples show how {topic} performs outside controlled settings. In one frequently cited case, a mid-sized organization applied {topic} to a long-standing operational problem and reported measurable gains within the first year.

Another example comes from a public initiative in which {topic} was used to coordinate many independent participants. Success there depended less on technology than on clear governance and shared goals.

Not every case is a success. Several projects involving {topic} were scaled back after early enthusiasm gave way to unexpected costs. These cases are valuable because they show where careful planning matters most."#;
